use std::collections::BTreeMap;

use rule::MatchAddress;

use crate::address::Address;

/// An injective partial function from `(client_id, port_id)` to live
/// [`Address`]es.
///
/// Backed by a [`BTreeMap`] so iteration is always in ascending
/// `(client_id, port_id)` order — the order the primary-port computation
/// and the hard-reset enumeration both depend on.
#[derive(Debug, Default)]
pub struct PortMap {
    ports: BTreeMap<(i32, i32), Address>,
}

impl PortMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `addr`, first computing its primary-sender/primary-dest
    /// flags against the ports of the same client already present.
    ///
    /// The flags are a snapshot: they are not retroactively revised when an
    /// earlier primary port is later removed. A full rebuild (hard reset)
    /// is the only way to repair drift.
    pub fn insert(&mut self, mut addr: Address) {
        let has_primary_sender = self
            .ports
            .values()
            .any(|p| p.client_id() == addr.client_id() && p.is_primary_sender());
        let has_primary_dest = self
            .ports
            .values()
            .any(|p| p.client_id() == addr.client_id() && p.is_primary_dest());

        let sender = addr.can_be_sender() && !has_primary_sender;
        let dest = addr.can_be_dest() && !has_primary_dest;
        addr.set_primary(sender, dest);

        self.ports.insert((addr.client_id(), addr.port_id()), addr);
    }

    /// Removes and returns the address at `key`, if known.
    pub fn remove(&mut self, key: (i32, i32)) -> Option<Address> {
        self.ports.remove(&key)
    }

    /// Looks up a known address by its numeric key.
    pub fn get(&self, key: (i32, i32)) -> Option<&Address> {
        self.ports.get(&key)
    }

    /// Whether `key` names a currently-known port.
    pub fn contains(&self, key: (i32, i32)) -> bool {
        self.ports.contains_key(&key)
    }

    /// Iterates all known addresses in ascending `(client_id, port_id)`
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.ports.values()
    }

    /// Number of known ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether the map holds no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Discards every known port, as part of a hard reset.
    pub fn clear(&mut self) {
        self.ports.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender_port(client: i32, port: i32) -> Address {
        Address::new(client, port, crate::address::CAN_SEND, 0, "c", "p")
    }

    #[test]
    fn first_sendable_port_of_a_client_is_primary() {
        let mut map = PortMap::new();
        map.insert(sender_port(1, 0));
        assert!(map.get((1, 0)).unwrap().is_primary_sender());
    }

    #[test]
    fn second_sendable_port_of_same_client_is_not_primary() {
        let mut map = PortMap::new();
        map.insert(sender_port(1, 0));
        map.insert(sender_port(1, 1));
        assert!(!map.get((1, 1)).unwrap().is_primary_sender());
    }

    #[test]
    fn removing_primary_does_not_promote_the_next_port() {
        let mut map = PortMap::new();
        map.insert(sender_port(1, 0));
        map.insert(sender_port(1, 1));
        map.remove((1, 0));
        assert!(!map.get((1, 1)).unwrap().is_primary_sender());
    }

    #[test]
    fn different_clients_each_get_their_own_primary() {
        let mut map = PortMap::new();
        map.insert(sender_port(1, 0));
        map.insert(sender_port(2, 0));
        assert!(map.get((1, 0)).unwrap().is_primary_sender());
        assert!(map.get((2, 0)).unwrap().is_primary_sender());
    }

    #[test]
    fn iteration_is_ascending() {
        let mut map = PortMap::new();
        map.insert(sender_port(2, 0));
        map.insert(sender_port(1, 5));
        map.insert(sender_port(1, 0));
        let keys: Vec<_> = map.iter().map(|a| a.key()).collect();
        assert_eq!(keys, vec![(1, 0), (1, 5), (2, 0)]);
    }
}

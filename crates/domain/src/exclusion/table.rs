use rrl_common::exclusion::{ExcludeV4Key, ExcludeV6Key, EXCLUDE_KEY_V4_LEN, EXCLUDE_KEY_V6_LEN};

use super::entity::ExclusionEntry;
use super::error::ExclusionError;

/// Default per-family capacity, matching the sizing of the original trie
/// maps this table replaces.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Node<const N: usize> {
    children: [Option<Box<Node<N>>>; 2],
    entry: Option<ExclusionEntry<N>>,
}

impl<const N: usize> Node<N> {
    fn new() -> Self {
        Self {
            children: [None, None],
            entry: None,
        }
    }
}

/// Binary trie keyed on the high `prefix_len` bits of an `N`-byte address.
///
/// Lookups return the longest matching prefix. Insertion canonicalizes the
/// key by masking bits beyond the prefix length, so `192.0.2.77/24` and
/// `192.0.2.0/24` are the same prefix.
pub struct PrefixTrie<const N: usize> {
    root: Node<N>,
    len: usize,
    capacity: usize,
}

fn bit<const N: usize>(key: &[u8; N], index: u8) -> usize {
    let byte = key[usize::from(index) / 8];
    usize::from((byte >> (7 - index % 8)) & 1)
}

fn mask<const N: usize>(key: &mut [u8; N], prefix_len: u8) {
    for (i, byte) in key.iter_mut().enumerate() {
        let bits_before = (i * 8) as u8;
        if bits_before >= prefix_len {
            *byte = 0;
        } else {
            let keep = prefix_len - bits_before;
            if keep < 8 {
                *byte &= 0xFF << (8 - keep);
            }
        }
    }
}

impl<const N: usize> PrefixTrie<N> {
    pub fn new(capacity: usize) -> Self {
        Self {
            root: Node::new(),
            len: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn max_prefix_len() -> u8 {
        (N * 8) as u8
    }

    fn check_prefix_len(prefix_len: u8) -> Result<(), ExclusionError> {
        if prefix_len > Self::max_prefix_len() {
            return Err(ExclusionError::InvalidPrefixLength {
                got: prefix_len,
                max: Self::max_prefix_len(),
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, mut prefix: [u8; N], prefix_len: u8) -> Result<(), ExclusionError> {
        Self::check_prefix_len(prefix_len)?;
        if self.len >= self.capacity {
            return Err(ExclusionError::TableFull {
                capacity: self.capacity,
            });
        }
        mask(&mut prefix, prefix_len);

        let mut node = &mut self.root;
        for i in 0..prefix_len {
            let b = bit(&prefix, i);
            node = node.children[b]
                .get_or_insert_with(|| Box::new(Node::new()))
                .as_mut();
        }
        if node.entry.is_some() {
            return Err(ExclusionError::DuplicatePrefix);
        }
        node.entry = Some(ExclusionEntry::new(prefix, prefix_len));
        self.len += 1;
        Ok(())
    }

    pub fn remove(&mut self, mut prefix: [u8; N], prefix_len: u8) -> Result<(), ExclusionError> {
        Self::check_prefix_len(prefix_len)?;
        mask(&mut prefix, prefix_len);

        let mut node = &mut self.root;
        for i in 0..prefix_len {
            let b = bit(&prefix, i);
            node = match node.children[b].as_deref_mut() {
                Some(child) => child,
                None => return Err(ExclusionError::PrefixNotFound),
            };
        }
        // Interior nodes left behind by a removal stay allocated; the table
        // is small and rebuilt on configuration reload.
        match node.entry.take() {
            Some(_) => {
                self.len -= 1;
                Ok(())
            }
            None => Err(ExclusionError::PrefixNotFound),
        }
    }

    /// Longest-prefix match against a full address.
    pub fn lookup(&self, addr: &[u8; N]) -> Option<&ExclusionEntry<N>> {
        let mut best = self.root.entry.as_ref();
        let mut node = &self.root;
        for i in 0..Self::max_prefix_len() {
            node = match node.children[bit(addr, i)].as_deref() {
                Some(child) => child,
                None => break,
            };
            if let Some(entry) = node.entry.as_ref() {
                best = Some(entry);
            }
        }
        best
    }

    /// Visit every stored entry, in no particular order.
    pub fn for_each<F: FnMut(&ExclusionEntry<N>)>(&self, mut visit: F) {
        fn walk<const N: usize, F: FnMut(&ExclusionEntry<N>)>(node: &Node<N>, visit: &mut F) {
            if let Some(entry) = node.entry.as_ref() {
                visit(entry);
            }
            for child in node.children.iter().flatten() {
                walk(child, visit);
            }
        }
        walk(&self.root, &mut visit);
    }
}

/// The pair of per-family exclusion tries consulted on the data path.
///
/// IPv6 addresses are matched on their first eight bytes only, mirroring
/// the truncated bucket key: prefixes longer than /64 cannot be stored.
pub struct ExclusionTables {
    pub v4: PrefixTrie<EXCLUDE_KEY_V4_LEN>,
    pub v6: PrefixTrie<EXCLUDE_KEY_V6_LEN>,
}

impl ExclusionTables {
    pub fn new(capacity_per_family: usize) -> Self {
        Self {
            v4: PrefixTrie::new(capacity_per_family),
            v6: PrefixTrie::new(capacity_per_family),
        }
    }

    pub fn match_v4(&self, addr: [u8; 4]) -> Option<&ExclusionEntry<EXCLUDE_KEY_V4_LEN>> {
        self.v4.lookup(&ExcludeV4Key::host(addr).addr)
    }

    pub fn match_v6(&self, addr: [u8; 16]) -> Option<&ExclusionEntry<EXCLUDE_KEY_V6_LEN>> {
        self.v6.lookup(&ExcludeV6Key::from_addr(&addr).addr)
    }
}

impl Default for ExclusionTables {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_longest_match() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(16);
        trie.insert([10, 0, 0, 0], 8).unwrap();
        trie.insert([10, 1, 0, 0], 16).unwrap();
        trie.insert([10, 1, 2, 0], 24).unwrap();

        let hit = trie.lookup(&[10, 1, 2, 3]).unwrap();
        assert_eq!(hit.prefix_len(), 24);

        let hit = trie.lookup(&[10, 1, 9, 9]).unwrap();
        assert_eq!(hit.prefix_len(), 16);

        let hit = trie.lookup(&[10, 200, 0, 1]).unwrap();
        assert_eq!(hit.prefix_len(), 8);

        assert!(trie.lookup(&[11, 0, 0, 1]).is_none());
    }

    #[test]
    fn host_prefix_matches_exact_address_only() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(4);
        trie.insert([192, 0, 2, 7], 32).unwrap();
        assert!(trie.lookup(&[192, 0, 2, 7]).is_some());
        assert!(trie.lookup(&[192, 0, 2, 8]).is_none());
    }

    #[test]
    fn insert_canonicalizes_host_bits() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(4);
        trie.insert([192, 0, 2, 77], 24).unwrap();
        let hit = trie.lookup(&[192, 0, 2, 1]).unwrap();
        assert_eq!(hit.prefix(), [192, 0, 2, 0]);
        assert_eq!(
            trie.insert([192, 0, 2, 0], 24),
            Err(ExclusionError::DuplicatePrefix)
        );
    }

    #[test]
    fn zero_length_prefix_matches_everything() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(4);
        trie.insert([0, 0, 0, 0], 0).unwrap();
        assert!(trie.lookup(&[1, 2, 3, 4]).is_some());
        assert!(trie.lookup(&[255, 255, 255, 255]).is_some());
    }

    #[test]
    fn remove_restores_shorter_match() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(8);
        trie.insert([10, 0, 0, 0], 8).unwrap();
        trie.insert([10, 1, 0, 0], 16).unwrap();
        trie.remove([10, 1, 0, 0], 16).unwrap();
        let hit = trie.lookup(&[10, 1, 0, 1]).unwrap();
        assert_eq!(hit.prefix_len(), 8);
        assert_eq!(trie.len(), 1);
        assert_eq!(
            trie.remove([10, 1, 0, 0], 16),
            Err(ExclusionError::PrefixNotFound)
        );
    }

    #[test]
    fn capacity_is_enforced() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(1);
        trie.insert([10, 0, 0, 0], 8).unwrap();
        assert_eq!(
            trie.insert([11, 0, 0, 0], 8),
            Err(ExclusionError::TableFull { capacity: 1 })
        );
    }

    #[test]
    fn prefix_len_bounds_checked() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(4);
        assert_eq!(
            trie.insert([0; 4], 33),
            Err(ExclusionError::InvalidPrefixLength { got: 33, max: 32 })
        );
    }

    #[test]
    fn v6_matches_on_first_eight_bytes() {
        let mut tables = ExclusionTables::new(8);
        let mut prefix = [0u8; 8];
        prefix[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
        tables.v6.insert(prefix, 32).unwrap();

        let mut addr = [0u8; 16];
        addr[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
        addr[15] = 0x42;
        assert!(tables.match_v6(addr).is_some());

        addr[1] = 0x02;
        assert!(tables.match_v6(addr).is_none());
    }

    #[test]
    fn for_each_visits_all_entries() {
        let mut trie: PrefixTrie<4> = PrefixTrie::new(8);
        trie.insert([10, 0, 0, 0], 8).unwrap();
        trie.insert([192, 168, 0, 0], 16).unwrap();
        let mut seen = Vec::new();
        trie.for_each(|e| seen.push(e.prefix_len()));
        seen.sort_unstable();
        assert_eq!(seen, vec![8, 16]);
    }
}

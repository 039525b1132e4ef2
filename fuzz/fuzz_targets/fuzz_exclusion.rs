#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::exclusion::PrefixTrie;

// Drive the exclusion trie with a script of inserts, removals, and lookups.
// Must never panic; every lookup hit must actually cover the queried
// address's leading bits.
//
// Consumed in 6-byte chunks:
//   [0]    = op (0=insert, 1=remove, 2=lookup)
//   [1]    = prefix length (mod 33)
//   [2..6] = address
fuzz_target!(|data: &[u8]| {
    let mut trie: PrefixTrie<4> = PrefixTrie::new(256);

    for chunk in data.chunks_exact(6) {
        let prefix_len = chunk[1] % 33;
        let addr = [chunk[2], chunk[3], chunk[4], chunk[5]];
        match chunk[0] % 3 {
            0 => {
                let _ = trie.insert(addr, prefix_len);
            }
            1 => {
                let _ = trie.remove(addr, prefix_len);
            }
            _ => {
                if let Some(entry) = trie.lookup(&addr) {
                    let len = usize::from(entry.prefix_len());
                    let hit = entry.prefix();
                    for i in 0..len {
                        let bit = |k: &[u8; 4]| (k[i / 8] >> (7 - i % 8)) & 1;
                        assert_eq!(bit(&hit), bit(&addr));
                    }
                }
            }
        }
    }
});

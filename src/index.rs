//! Document-wide key index.
//!
//! One open-addressed table serves every map in a document. The probed hash
//! is `parent_element_id XOR wyhash(key_bytes)`: a hash-and-key match
//! mathematically implies a parent match, so no per-entry parent field is
//! stored. Buckets are 8-way associative and sized to one 64-byte cache
//! line, which keeps probing cheap up to a 90% load factor.

/// wyhash (github.com/wangyi-fudan/wyhash, 18a25157b) with a fixed zero
/// seed pre-mixed into the published secrets.
mod wy {
    const SECRET0: u64 = 0x2d358dccaa6c78a5;
    const SECRET1: u64 = 0x8bb84b93962eacc9;
    const SECRET2: u64 = 0x4b33a62ed433d4a3;
    const SECRET3: u64 = 0x4d5a2da51de1aa47;
    /// seed ^= wymix(seed ^ SECRET0, SECRET1) with seed = 0
    const SEED: u64 = 0xca813bf4c7abf0a9;

    #[inline]
    fn wymix(a: u64, b: u64) -> u64 {
        let r = u128::from(a) * u128::from(b);
        (r as u64) ^ ((r >> 64) as u64)
    }

    #[inline]
    fn wyr8(p: &[u8]) -> u64 {
        u64::from_le_bytes(p[..8].try_into().expect("8-byte read"))
    }

    #[inline]
    fn wyr4(p: &[u8]) -> u64 {
        u64::from(u32::from_le_bytes(p[..4].try_into().expect("4-byte read")))
    }

    #[inline]
    fn wyr3(p: &[u8], k: usize) -> u64 {
        (u64::from(p[0]) << 16) | (u64::from(p[k >> 1]) << 8) | u64::from(p[k - 1])
    }

    pub fn wyhash(key: &[u8]) -> u64 {
        let len = key.len();
        let mut seed = SEED;
        let mut p = key;
        let (mut a, mut b);

        if len <= 16 {
            if len >= 4 {
                a = (wyr4(p) << 32) | wyr4(&p[(len >> 3) << 2..]);
                b = (wyr4(&p[len - 4..]) << 32) | wyr4(&p[len - 4 - ((len >> 3) << 2)..]);
            } else if len > 0 {
                a = wyr3(p, len);
                b = 0;
            } else {
                a = 0;
                b = 0;
            }
        } else {
            let mut i = len;
            if i >= 48 {
                let mut see1 = seed;
                let mut see2 = seed;
                while i >= 48 {
                    seed = wymix(wyr8(p) ^ SECRET1, wyr8(&p[8..]) ^ seed);
                    see1 = wymix(wyr8(&p[16..]) ^ SECRET2, wyr8(&p[24..]) ^ see1);
                    see2 = wymix(wyr8(&p[32..]) ^ SECRET3, wyr8(&p[40..]) ^ see2);
                    p = &p[48..];
                    i -= 48;
                }
                seed ^= see1 ^ see2;
            }
            while i > 16 {
                seed = wymix(wyr8(p) ^ SECRET1, wyr8(&p[8..]) ^ seed);
                p = &p[16..];
                i -= 16;
            }
            a = wyr8(&p[i - 16..]);
            b = wyr8(&p[i - 8..]);
        }

        a ^= SECRET1;
        b ^= seed;
        let r = u128::from(a) * u128::from(b);
        a = r as u64;
        b = (r >> 64) as u64;
        wymix(a ^ SECRET0 ^ len as u64, b ^ SECRET1)
    }
}

pub(crate) use wy::wyhash;

// Hash 0 marks an empty cell, hash 1 a tombstone.
const TOMBSTONE: u32 = 1;
const FIRST_VALID: u32 = 2;
/// 90% load with 8-way associativity, in 128ths.
const MAX_LOAD_128TH: u64 = 115;
const BUCKET_WAY: usize = 8;
const INIT_ENTRY_QTY: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    hash: u32,
    /// Child slot inside the parent's child array, not an element id.
    slot: u32,
}

/// One cache line worth of entries.
#[repr(align(64))]
#[derive(Debug, Clone, Copy, Default)]
struct Bucket([Entry; BUCKET_WAY]);

#[derive(Debug)]
pub(crate) struct KeyIndex {
    buckets: Vec<Bucket>,
    /// Entries ever inserted since the last resize; tombstones are not
    /// subtracted, they are reclaimed when the table grows.
    live: u32,
}

/// Probed hash for `(parent, key)`. Hashes 0 and 1 are reserved for empty
/// and tombstone cells, so computed values below 2 are bumped up.
pub(crate) fn key_hash(parent_id: u32, key: &[u8]) -> u32 {
    let hash = parent_id ^ (wyhash(key) as u32);
    if hash < FIRST_VALID {
        hash + FIRST_VALID
    } else {
        hash
    }
}

impl KeyIndex {
    pub fn new() -> Self {
        Self {
            buckets: vec![Bucket::default(); INIT_ENTRY_QTY / BUCKET_WAY],
            live: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_WAY
    }

    #[inline]
    fn start_bucket(&self, hash: u32) -> usize {
        (hash as usize & (self.capacity() - 1)) / BUCKET_WAY
    }

    /// Find the child slot stored for `hash`. `matches` confirms that the
    /// candidate slot really holds the probed key under the probed parent.
    pub fn lookup(&self, hash: u32, mut matches: impl FnMut(u32) -> bool) -> Option<u32> {
        let bucket_mask = self.buckets.len() - 1;
        let mut bucket = self.start_bucket(hash);
        let mut probe = 1;
        loop {
            let cells = &self.buckets[bucket].0;
            let mut cell = 0;
            while cell < BUCKET_WAY && cells[cell].hash >= TOMBSTONE {
                if cells[cell].hash == hash && matches(cells[cell].slot) {
                    return Some(cells[cell].slot);
                }
                cell += 1;
            }
            if cell < BUCKET_WAY {
                // An empty cell on this line means the key is absent.
                return None;
            }
            bucket = (bucket + probe) & bucket_mask;
            probe += 1;
        }
    }

    /// Insert `(hash, slot)`. Returns `false` if the key was already present
    /// (the stored slot is overwritten in that case).
    pub fn insert(&mut self, hash: u32, slot: u32, mut matches: impl FnMut(u32) -> bool) -> bool {
        let bucket_mask = self.buckets.len() - 1;
        let mut bucket = self.start_bucket(hash);
        let mut probe = 1;
        let cell = loop {
            let cells = &mut self.buckets[bucket].0;
            let mut cell = 0;
            while cell < BUCKET_WAY && cells[cell].hash >= FIRST_VALID {
                if cells[cell].hash == hash && matches(cells[cell].slot) {
                    cells[cell].slot = slot;
                    return false;
                }
                cell += 1;
            }
            if cell < BUCKET_WAY {
                // Empty or tombstone cell, reusable.
                break cell;
            }
            bucket = (bucket + probe) & bucket_mask;
            probe += 1;
        };

        self.buckets[bucket].0[cell] = Entry { hash, slot };
        self.live += 1;
        if 128 * u64::from(self.live) > MAX_LOAD_128TH * self.capacity() as u64 {
            self.resize(self.capacity() * 2);
        }
        true
    }

    /// Remove the entry for `hash`, returning its stored slot. The cell
    /// becomes a tombstone so longer probe chains stay intact.
    pub fn remove(&mut self, hash: u32, mut matches: impl FnMut(u32) -> bool) -> Option<u32> {
        let bucket_mask = self.buckets.len() - 1;
        let mut bucket = self.start_bucket(hash);
        let mut probe = 1;
        loop {
            let cells = &mut self.buckets[bucket].0;
            let mut cell = 0;
            while cell < BUCKET_WAY && cells[cell].hash >= TOMBSTONE {
                if cells[cell].hash == hash && matches(cells[cell].slot) {
                    let slot = cells[cell].slot;
                    cells[cell] = Entry {
                        hash: TOMBSTONE,
                        slot: u32::MAX,
                    };
                    return Some(slot);
                }
                cell += 1;
            }
            if cell < BUCKET_WAY {
                return None;
            }
            bucket = (bucket + probe) & bucket_mask;
            probe += 1;
        }
    }

    fn resize(&mut self, new_entry_qty: usize) {
        let mut new_buckets = vec![Bucket::default(); new_entry_qty / BUCKET_WAY];
        let new_mask = new_buckets.len() - 1;

        for old in &self.buckets {
            for entry in &old.0 {
                if entry.hash < FIRST_VALID {
                    continue;
                }
                let mut bucket = (entry.hash as usize & (new_entry_qty - 1)) / BUCKET_WAY;
                let mut probe = 1;
                'place: loop {
                    let cells = &mut new_buckets[bucket].0;
                    for cell in cells.iter_mut() {
                        if cell.hash < FIRST_VALID {
                            *cell = *entry;
                            break 'place;
                        }
                    }
                    bucket = (bucket + probe) & new_mask;
                    probe += 1;
                }
            }
        }

        self.buckets = new_buckets;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_wyhash_is_stable_and_discriminating() {
        let a = wyhash(b"alpha");
        assert_eq!(a, wyhash(b"alpha"));
        assert_ne!(a, wyhash(b"alphb"));
        assert_ne!(wyhash(b""), wyhash(b"a"));
        // Each small-input length class goes through a distinct read path.
        for len in 0..64 {
            let data = vec![0x5a_u8; len];
            assert_eq!(wyhash(&data), wyhash(&data));
        }
    }

    #[rstest::rstest]
    fn test_parent_id_changes_hash() {
        assert_ne!(key_hash(1, b"name"), key_hash(2, b"name"));
        assert!(key_hash(0, b"") >= 2);
    }

    #[rstest::rstest]
    fn test_insert_lookup_remove() {
        let mut index = KeyIndex::new();
        let hash = key_hash(1, b"name");
        assert!(index.insert(hash, 3, |_| false));
        assert_eq!(index.lookup(hash, |slot| slot == 3), Some(3));
        assert_eq!(index.lookup(hash, |_| false), None);
        assert_eq!(index.remove(hash, |slot| slot == 3), Some(3));
        assert_eq!(index.lookup(hash, |_| true), None);
    }

    #[rstest::rstest]
    fn test_duplicate_insert_overwrites_and_reports() {
        let mut index = KeyIndex::new();
        let hash = key_hash(1, b"k");
        assert!(index.insert(hash, 0, |_| false));
        assert!(!index.insert(hash, 9, |slot| slot == 0));
        assert_eq!(index.lookup(hash, |slot| slot == 9), Some(9));
    }

    #[rstest::rstest]
    fn test_tombstone_keeps_probe_chain() {
        let mut index = KeyIndex::new();
        // Force every entry into the same cache line by reusing one hash;
        // the match closure discriminates by slot.
        let hash = key_hash(42, b"collide");
        for slot in 0..6 {
            assert!(index.insert(hash, slot, |_| false));
        }
        assert_eq!(index.remove(hash, |slot| slot == 2), Some(2));
        // Entries placed after the tombstoned one must stay reachable.
        assert_eq!(index.lookup(hash, |slot| slot == 5), Some(5));
    }

    #[rstest::rstest]
    fn test_grows_past_initial_capacity() {
        let mut index = KeyIndex::new();
        let keys: Vec<String> = (0..200).map(|i| format!("key-{i}")).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(index.insert(key_hash(1, key.as_bytes()), i as u32, |_| false));
        }
        for (i, key) in keys.iter().enumerate() {
            let expected = i as u32;
            assert_eq!(
                index.lookup(key_hash(1, key.as_bytes()), |slot| slot == expected),
                Some(expected),
                "lost {key} after growth"
            );
        }
    }
}

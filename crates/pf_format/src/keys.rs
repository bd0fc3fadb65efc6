use std::collections::HashSet;

use pf_core::FormattedDocument;
use uuid::Uuid;

pub const KEY_LEN: usize = 12;

/// Issues short random keys that never repeat within one document.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    issued: HashSet<String>,
}

impl KeyGenerator {
    pub fn next_key(&mut self) -> String {
        loop {
            let mut key = Uuid::new_v4().simple().to_string();
            key.truncate(KEY_LEN);
            if self.issued.insert(key.clone()) {
                return key;
            }
        }
    }

    /// Record an existing key; false when it was already taken.
    pub fn claim(&mut self, key: &str) -> bool {
        !key.is_empty() && self.issued.insert(key.to_string())
    }
}

/// Replace empty or repeated block and span keys with fresh ones.
/// Returns how many keys were rewritten.
pub fn rekey_duplicates(document: &mut FormattedDocument) -> usize {
    let mut keys = KeyGenerator::default();
    let mut rewritten = 0;
    for block in &mut document.content {
        if !keys.claim(&block.key) {
            block.key = keys.next_key();
            rewritten += 1;
        }
        for span in &mut block.children {
            if !keys.claim(&span.key) {
                span.key = keys.next_key();
                rewritten += 1;
            }
        }
    }
    rewritten
}

//! Sharded string interner for identifier storage.
//!
//! Interning is O(1) amortized and thread-safe via per-shard locking, so a
//! single interner can be shared between the lexer, the evaluator, and test
//! harnesses without copying strings around.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0 so Name::EMPTY is always valid
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded its local index capacity.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Sharded string interner.
///
/// Interned strings are leaked and never deallocated, which gives every
/// stored `&'static str` a stable address for the life of the process.
///
/// # Thread Safety
/// Uses an `RwLock` per shard; wrap in [`SharedInterner`] to share across
/// threads.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with pre-interned keywords.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        // Start with 1 for the empty string pre-interned in shard 0
        let interner = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        interner.pre_intern_keywords();
        interner
    }

    /// Compute shard for a string based on its hash.
    ///
    /// The empty string must map to shard 0, where it is pre-interned at
    /// local index 0 so that it resolves to [`Name::EMPTY`].
    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        // shard_idx < NUM_SHARDS (8) due to modulo, always fits in u32
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (8)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());

        let local = u32::try_from(guard.strings.len()).map_err(|_| InternError::ShardOverflow {
            shard_idx,
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard runs out of local indices. Use `try_intern` for
    /// fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Try to intern an owned String without re-allocating it.
    pub fn try_intern_owned(&self, s: String) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(&s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (8)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s.as_str()) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        if let Some(&local) = guard.map.get(s.as_str()) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        // Leak the owned string directly, no extra allocation
        let leaked: &'static str = Box::leak(s.into_boxed_str());

        let local = u32::try_from(guard.strings.len()).map_err(|_| InternError::ShardOverflow {
            shard_idx,
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern an owned String, avoiding double allocation.
    ///
    /// Useful when the caller already owns the text, e.g. after decoding
    /// escape sequences in a string literal.
    ///
    /// # Panics
    /// Panics if a shard runs out of local indices. Use `try_intern_owned`
    /// for fallible interning.
    pub fn intern_owned(&self, s: String) -> Name {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &str {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.strings[name.local()]
    }

    /// Pre-intern Tern keywords and builtin names.
    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Keywords
            "if", "else", "while", "fn", "return", "break", "continue", "and", "or", "not", "as",
            "true", "false", "none",
            // Builtin functions
            "print", "len", "str", "int", "float", "abs", "find", "range",
        ];

        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner holds only the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned string names.
///
/// Higher-level crates accept any `StringLookup` implementor instead of
/// depending on `StringInterner` directly.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Shared handle to a [`StringInterner`].
///
/// The lexer, evaluator, and diagnostics all hold one of these; cloning is
/// an `Arc` bump, and all clones observe the same names.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

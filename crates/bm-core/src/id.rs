use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for annotation IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

const PENDING_PREFIX: &str = "_pending";

/// Identifier of an annotation, as assigned by the annotation store.
///
/// Internally a 4-byte `Spur` index, so copies and comparisons are O(1). The canvas
/// never invents real IDs; it only mints *provisional* ones for boxes it has
/// drawn but the store has not acknowledged yet.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(Spur);

impl AnnotationId {
    /// Intern a store-assigned ID, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        AnnotationId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Mint a unique provisional ID for an optimistically created annotation.
    pub fn provisional() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{PENDING_PREFIX}_{n}"))
    }

    /// `true` if this ID was minted by [`AnnotationId::provisional`].
    pub fn is_provisional(&self) -> bool {
        self.as_str().starts_with(PENDING_PREFIX)
    }
}

impl fmt::Debug for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnnotationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AnnotationId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = AnnotationId::intern("3f2a9c1e");
        let b = AnnotationId::intern("3f2a9c1e");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "3f2a9c1e");
        assert!(!a.is_provisional());
    }

    #[test]
    fn provisional_ids_are_unique() {
        let a = AnnotationId::provisional();
        let b = AnnotationId::provisional();
        assert_ne!(a, b);
        assert!(a.is_provisional());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AnnotationId::intern("ann-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ann-7\"");
        let back: AnnotationId = serde_json::from_str("\"ann-7\"").unwrap();
        assert_eq!(back, id);
    }
}

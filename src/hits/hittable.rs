//! Polymorphic hit targets
//!
//! A hit always points at exactly one `(kind, id)` pair. Kinds are plain
//! constants declared by the host application on its own entity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static description of a hittable entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HittableKind {
    /// Discriminator stored in `hits.hittable_type`
    pub name: &'static str,
    /// Table holding the entities, used by popular/trending rankings
    pub table: &'static str,
    /// Integer primary key column of `table`
    pub primary_key: &'static str,
}

impl HittableKind {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            primary_key: "id",
        }
    }

    pub const fn with_primary_key(self, primary_key: &'static str) -> Self {
        Self {
            primary_key,
            ..self
        }
    }

    pub fn target(&self, id: i64) -> HittableRef {
        HittableRef::new(self.name, id)
    }
}

/// Implemented by host entities that accumulate hits.
///
/// ```
/// use hitcounter::hits::{Hittable, HittableKind};
///
/// struct Article {
///     id: i64,
/// }
///
/// impl Hittable for Article {
///     const KIND: HittableKind = HittableKind::new("article", "articles");
///
///     fn hittable_id(&self) -> i64 {
///         self.id
///     }
/// }
///
/// let target = Article { id: 3 }.hittable_ref();
/// assert_eq!(target.kind(), "article");
/// assert_eq!(target.id(), 3);
/// ```
pub trait Hittable {
    const KIND: HittableKind;

    fn hittable_id(&self) -> i64;

    fn hittable_ref(&self) -> HittableRef {
        Self::KIND.target(self.hittable_id())
    }
}

/// `(hittable_type, hittable_id)` of one target entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HittableRef {
    kind: String,
    id: i64,
}

impl HittableRef {
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for HittableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Video(i64);

    impl Hittable for Video {
        const KIND: HittableKind =
            HittableKind::new("video", "media_videos").with_primary_key("video_id");

        fn hittable_id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_kind_builder() {
        assert_eq!(Video::KIND.table, "media_videos");
        assert_eq!(Video::KIND.primary_key, "video_id");
        assert_eq!(HittableKind::new("post", "posts").primary_key, "id");
    }

    #[test]
    fn test_hittable_ref() {
        let target = Video(9).hittable_ref();
        assert_eq!(target, HittableRef::new("video", 9));
        assert_eq!(target.to_string(), "video#9");
    }
}

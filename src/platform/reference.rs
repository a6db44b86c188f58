#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Database,
    Storage,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

/// Location inside the database or the object storage of an app.
///
/// References are plain values: deriving one performs no I/O and they can be
/// rebuilt at any time from the connection and a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    kind: ReferenceKind,
    app_id: String,
    path: String,
}

impl Reference {
    /// Builds a reference, normalizing `path` to a single leading slash with
    /// no empty segments (`"a//b/"` becomes `"/a/b"`, `""` becomes `"/"`).
    pub fn new(kind: ReferenceKind, app_id: impl Into<String>, path: &str) -> Self {
        Self {
            kind,
            app_id: app_id.into(),
            path: normalize(path),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Last path segment, [`None`] for the root.
    pub fn key(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Reference to `segment` (which may contain slashes) below this one.
    pub fn child(&self, segment: &str) -> Self {
        Self::new(self.kind, self.app_id.clone(), &format!("{}/{}", self.path, segment))
    }

    /// Parent reference, [`None`] for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let parent = self.path.rsplit_once('/').map(|(p, _)| p).unwrap_or_default();
        Some(Self::new(self.kind, self.app_id.clone(), parent))
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.kind, self.app_id, self.path)
    }
}

fn normalize(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("a//b/"), "/a/b");
        assert_eq!(normalize("/uploads/tenant"), "/uploads/tenant");
    }

    #[test]
    fn navigation() {
        let root = Reference::new(ReferenceKind::Database, "app", "/");
        assert!(root.is_root());
        assert_eq!(root.key(), None);
        assert_eq!(root.parent(), None);

        let child = root.child("users/u1");
        assert_eq!(child.path(), "/users/u1");
        assert_eq!(child.key(), Some("u1"));
        assert_eq!(child.to_string(), "database://app/users/u1");

        let parent = child.parent().unwrap();
        assert_eq!(parent.path(), "/users");
        assert_eq!(parent.parent().unwrap(), root);
    }
}

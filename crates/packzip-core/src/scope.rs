//! Which build's packs to fetch, and the object prefix for a pack.

/// Branch and build number of the CI run whose uploads we fetch.
///
/// Both must be given for either to apply; with only one of them the scope
/// falls back to the unscoped base path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildScope {
    branch: String,
    build: String,
}

impl BuildScope {
    pub fn new(branch: Option<&str>, build: Option<&str>) -> Self {
        match (non_empty(branch), non_empty(build)) {
            (Some(branch), Some(build)) => Self {
                branch: branch.to_string(),
                build: build.to_string(),
            },
            _ => Self::default(),
        }
    }

    pub fn is_scoped(&self) -> bool {
        !self.branch.is_empty()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn build(&self) -> &str {
        &self.build
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// `<base>/<branch>/<build>/<pack>/`, skipping empty segments.
///
/// The trailing slash keeps `Base` from matching `BaseExtra`.
pub fn pack_prefix(base_path: &str, scope: &BuildScope, pack: &str) -> String {
    let mut prefix = String::new();
    for segment in [base_path, scope.branch(), scope.build(), pack] {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        prefix.push_str(segment);
        prefix.push('/');
    }
    prefix
}

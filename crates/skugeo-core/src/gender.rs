use std::fmt;

/// Department filter understood by the catalog search backend.
///
/// The CLI and callers speak in the storefront's Chinese labels
/// (`男士`, `女士`, `儿童`, `家居`); the backend expects its own enum codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenderCategory {
    Man,
    #[default]
    Woman,
    Kid,
    Home,
}

impl GenderCategory {
    /// Maps a storefront label to a category.
    ///
    /// Unrecognized labels fall back to [`GenderCategory::Woman`], the
    /// backend's largest department. This fallback is intentional and logged.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "男士" => GenderCategory::Man,
            "女士" => GenderCategory::Woman,
            "儿童" => GenderCategory::Kid,
            "家居" => GenderCategory::Home,
            other => {
                tracing::warn!(
                    label = other,
                    "unrecognized gender category, defaulting to WOMAN"
                );
                GenderCategory::Woman
            }
        }
    }

    /// Enum code sent in the search request's `gender` filter.
    #[must_use]
    pub fn upstream_code(self) -> &'static str {
        match self {
            GenderCategory::Man => "MAN",
            GenderCategory::Woman => "WOMAN",
            GenderCategory::Kid => "KID",
            GenderCategory::Home => "HOME",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GenderCategory::Man => "男士",
            GenderCategory::Woman => "女士",
            GenderCategory::Kid => "儿童",
            GenderCategory::Home => "家居",
        }
    }
}

impl fmt::Display for GenderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

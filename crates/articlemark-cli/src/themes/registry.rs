use super::definitions;
use super::Theme;

/// All built-in themes, in display order
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self {
            themes: vec![
                definitions::dark::dark(),
                definitions::light::light(),
                definitions::terminal::terminal(),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name))
    }

    pub fn all(&self) -> &[Theme] {
        &self.themes
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.get("Light").map(|t| t.name.as_str()), Some("light"));
        assert!(registry.get("neon").is_none());
    }

    #[test]
    fn test_names_in_order() {
        let registry = ThemeRegistry::new();
        let names: Vec<&str> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["dark", "light", "terminal"]);
    }
}

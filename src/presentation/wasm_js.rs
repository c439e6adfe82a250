use super::ColorSchemeHost;
#[cfg(feature = "tracing")]
use tracing::error;

const DARK_CLASS: &str = "dark";
const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Implementation of [`ColorSchemeHost`] that toggles the `dark` class on `<html>`.
///
/// This is the class-based dark mode convention used by utility CSS frameworks.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentColorScheme;

impl DocumentColorScheme {
    /// Creates a new instance of [`DocumentColorScheme`].
    pub fn new() -> Self {
        Self
    }
}

impl ColorSchemeHost for DocumentColorScheme {
    fn prefers_dark(&self) -> bool {
        match gloo_utils::window().match_media(PREFERS_DARK_QUERY) {
            Ok(Some(query)) => query.matches(),
            Ok(None) => false,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                error!("Could not query color scheme preference: {_e:?}");
                false
            }
        }
    }

    fn is_dark(&self) -> bool {
        gloo_utils::document_element()
            .class_list()
            .contains(DARK_CLASS)
    }

    fn set_dark(&mut self, dark: bool) {
        let class_list = gloo_utils::document_element().class_list();
        let result = if dark {
            class_list.add_1(DARK_CLASS)
        } else {
            class_list.remove_1(DARK_CLASS)
        };
        if let Err(_e) = result {
            #[cfg(feature = "tracing")]
            error!("Could not update the document class list: {_e:?}");
        }
    }
}

impl From<DocumentColorScheme> for Box<dyn ColorSchemeHost> {
    fn from(host: DocumentColorScheme) -> Self {
        Box::new(host)
    }
}

#[allow(dead_code)]
#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_document_color_scheme() {
        let mut host = DocumentColorScheme;
        host.set_dark(true);
        assert!(host.is_dark());
        host.set_dark(false);
        assert!(!host.is_dark());
    }
}

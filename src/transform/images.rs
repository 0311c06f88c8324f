//! Rewrites image references to absolute URLs.
//!
//! Pages reference images in three ways: an MDX import binding, a plain
//! Markdown image, or an `<Image>` component. All three become a Markdown
//! image pointing at the published site so the browser can load them while
//! printing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"import\s+(\w+)\s+from\s+['"]([^'"]+\.(?i:png|jpe?g|gif|svg|webp|avif))['"];?"#,
    )
    .expect("valid import regex")
});

static RE_MARKDOWN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid image regex"));

static RE_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<Image\s+src=\{([^}]+)\}\s+alt="([^"]+)"[^>]*>"#)
        .expect("valid component regex")
});

/// Strip leading `./`, `../`, `/` and `~` markers from a relative path
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches(['.', '/', '~'])
}

fn absolute_image(alt: &str, path: &str, base_url: &str) -> String {
    format!(
        "![{alt}]({}/{})",
        base_url.trim_end_matches('/'),
        normalize_path(path)
    )
}

/// Rewrite every image reference in `content` to point below `base_url`.
///
/// Markdown images that already use an `http` URL are left as they are.
pub fn rewrite_image_paths(content: &str, base_url: &str) -> String {
    let content = RE_IMPORT.replace_all(content, |caps: &Captures| {
        absolute_image(&caps[1], &caps[2], base_url)
    });

    let content = RE_MARKDOWN.replace_all(&content, |caps: &Captures| {
        let path = &caps[2];
        if path.starts_with("http") {
            caps[0].to_string()
        } else {
            absolute_image(&caps[1], path, base_url)
        }
    });

    RE_COMPONENT
        .replace_all(&content, |caps: &Captures| {
            let src = caps[1].trim_matches(['{', '}']).trim_matches(['"', '\'']);
            absolute_image(&caps[2], src, base_url)
        })
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    const BASE: &str = "https://docs.example.com/";

    #[test]
    fn rewrites_import_bindings() {
        let input = "import diagram from '../../assets/diagram.png';\n\nSee above.";
        assert_eq!(
            rewrite_image_paths(input, BASE),
            "![diagram](https://docs.example.com/assets/diagram.png)\n\nSee above."
        );
    }

    #[test]
    fn leaves_component_imports_alone() {
        let input = "import Since from '~/components/Since.astro';";
        assert_eq!(rewrite_image_paths(input, BASE), input);
    }

    #[test]
    fn rewrites_relative_markdown_images() {
        let input = "Look: ![A logo](./images/logo.svg) and ![](~/img/x.webp)";
        assert_eq!(
            rewrite_image_paths(input, BASE),
            "Look: ![A logo](https://docs.example.com/images/logo.svg) and ![](https://docs.example.com/img/x.webp)"
        );
    }

    #[test]
    fn absolute_images_are_untouched() {
        let input = "![Remote](https://cdn.example.org/pic.png)\n![Plain](http://x.org/a.gif)";
        let once = rewrite_image_paths(input, BASE);
        assert_eq!(once, input);
        assert_eq!(rewrite_image_paths(&once, BASE), input);
    }

    #[test]
    fn rewrites_image_components() {
        let input = r#"<Image src={"/assets/hero.jpg"} alt="Hero image" width="300" />"#;
        assert_eq!(
            rewrite_image_paths(input, BASE),
            "![Hero image](https://docs.example.com/assets/hero.jpg)"
        );
    }

    #[test]
    fn normalizes_leading_markers() {
        assert_eq!(normalize_path("../../a/b.png"), "a/b.png");
        assert_eq!(normalize_path("~/a.png"), "a.png");
        assert_eq!(normalize_path("a.png"), "a.png");
    }
}

//! Default snippet text for new components and the global overrides

use crate::interpreter::builtins::UI_COMPONENTS;

/// Override template for a freshly added component
pub fn default_overrides(key: &str) -> String {
    format!(
        r#"{{
  // {key}: style object for base or default style
  baseStyle: {{}},
  // styles for different sizes ("sm", "md", "lg")
  sizes: {{}},
  // styles for different visual variants ("outline", "solid")
  variants: {{}},
  // default values for 'size' and 'variant'
  defaultProps: {{
    size: "md",
    colorScheme: "brand",
  }},
}}"#
    )
}

/// Render template: the key's own `ui` constructor when there is one,
/// otherwise a `Box` labelled with the key
pub fn default_render(key: &str) -> String {
    if UI_COMPONENTS.contains(&key) {
        format!(r#"({{ size, variant }}) => ui.{key}({{ size, variant }}, "Hello")"#)
    } else {
        format!(r#"({{ size, variant }}) => ui.Box({{ size, variant }}, {key:?})"#)
    }
}

/// Global overrides a new session starts with
pub fn default_global_overrides() -> String {
    r#"{
  colors: {
    brand: {
      50: '#f5e3ff',
      100: '#d8b2ff',
      200: '#bd80ff',
      300: '#a34dff',
      400: '#881bfe',
      500: '#6f02e5',
      600: '#5600b3',
      700: '#3e0081',
      800: '#25004f',
      900: '#0e001f',
    }
  },
  fonts: {
    body: "system-ui, sans-serif",
    heading: "Georgia, serif",
    mono: "Menlo, monospace",
  },
  styles: {
    global: {
      a: {
        color: "brand.500",
        _hover: {
          textDecoration: "underline",
        },
      },
    },
  },
  fontSizes: {},
  fontWeights: {},
  lineHeights: {},
  letterSpacings: {},
}"#
    .to_string()
}

/// Components a default session is seeded with: (key, name, render source)
pub(crate) fn seed_components() -> Vec<(&'static str, &'static str, String)> {
    vec![
        (
            "Button",
            "Buttons",
            default_render("Button"),
        ),
        (
            "Checkbox",
            "Checkboxes",
            r#"({ size, variant }) => ui.Checkbox({ size, variant })"#.to_string(),
        ),
        (
            "Input",
            "Inputs",
            r#"({ size, variant }) => ui.Input({ size, variant, defaultValue: "input" })"#
                .to_string(),
        ),
    ]
}

//! Built-in base theme
//!
//! The base theme is written in the same literal language as user overrides
//! and evaluated once when the compositor is built. User values win over it
//! at every path.

pub const BASE_THEME_SOURCE: &str = r##"{
  colors: {
    white: "#ffffff",
    black: "#000000",
    gray: {
      50: "#f7fafc", 100: "#edf2f7", 200: "#e2e8f0", 300: "#cbd5e0", 400: "#a0aec0",
      500: "#718096", 600: "#4a5568", 700: "#2d3748", 800: "#1a202c", 900: "#171923",
    },
    blue: {
      50: "#ebf8ff", 100: "#bee3f8", 200: "#90cdf4", 300: "#63b3ed", 400: "#4299e1",
      500: "#3182ce", 600: "#2b6cb0", 700: "#2c5282", 800: "#2a4365", 900: "#1a365d",
    },
    green: {
      50: "#f0fff4", 100: "#c6f6d5", 200: "#9ae6b4", 300: "#68d391", 400: "#48bb78",
      500: "#38a169", 600: "#2f855a", 700: "#276749", 800: "#22543d", 900: "#1c4532",
    },
    red: {
      50: "#fff5f5", 100: "#fed7d7", 200: "#feb2b2", 300: "#fc8181", 400: "#f56565",
      500: "#e53e3e", 600: "#c53030", 700: "#9b2c2c", 800: "#822727", 900: "#63171b",
    },
    brand: {
      50: "#e6f6ff", 100: "#bae3ff", 200: "#7cc4fa", 300: "#47a3f3", 400: "#2186eb",
      500: "#0967d2", 600: "#0552b5", 700: "#03449e", 800: "#01337d", 900: "#002159",
    },
  },
  fonts: {
    body: "-apple-system, system-ui, sans-serif",
    heading: "-apple-system, system-ui, sans-serif",
    mono: "SFMono-Regular, Menlo, monospace",
  },
  fontSizes: {
    xs: "0.75rem", sm: "0.875rem", md: "1rem", lg: "1.125rem",
    xl: "1.25rem", "2xl": "1.5rem", "3xl": "1.875rem", "4xl": "2.25rem",
  },
  fontWeights: { normal: 400, medium: 500, semibold: 600, bold: 700 },
  lineHeights: { normal: "normal", short: 1.375, base: 1.5, tall: 1.625 },
  letterSpacings: { tight: "-0.025em", normal: "0", wide: "0.025em" },
  space: {
    px: "1px", 1: "0.25rem", 2: "0.5rem", 3: "0.75rem", 4: "1rem",
    6: "1.5rem", 8: "2rem", 12: "3rem", 16: "4rem",
  },
  radii: { none: "0", sm: "0.125rem", md: "0.375rem", lg: "0.5rem", full: "9999px" },
  styles: {
    global: {
      body: { fontFamily: "body", color: "gray.800", bg: "white", lineHeight: "base" },
    },
  },
  components: {},
}"##;

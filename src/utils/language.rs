//! Language name normalization
//!
//! Client-supplied language names arrive with typos and variants; every
//! language-keyed lookup happens after normalization at the edge.

/// Normalize a language name to its canonical identifier.
///
/// Unknown names pass through lowercased so the language lookup itself can
/// reject them.
pub fn normalize_language(lang: &str) -> String {
    let lang = lang.to_lowercase();

    let normalized = match lang.as_str() {
        "js" | "jscript" | "javscript" | "javsscript" | "javascipt" | "javasript"
        | "javascript" | "java script" | "jscipt" => "js",

        "python" | "pyt" | "pyn" | "pythn" | "phyton" | "py" | "py thon" | "pthon" => "python",

        "go" | "golang" | "gol" | "goo" | "g o" | "golangg" => "go",

        "cpp" | "c++" | "cp" | "cppp" | "c plus" | "cxx" | "cc" => "cpp",

        other => other,
    };

    normalized.to_string()
}

/// Languages whose templates receive the test-case JSON with every `"`
/// escaped as `\"` before substitution
pub fn needs_json_escaping(language: &str) -> bool {
    matches!(language, "python" | "py" | "javascript" | "js")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_javascript_aliases() {
        for alias in ["js", "jscript", "javscript", "javsscript", "javascipt", "javasript", "javascript", "java script", "jscipt"] {
            assert_eq!(normalize_language(alias), "js", "alias {alias}");
        }
    }

    #[test]
    fn test_python_aliases() {
        for alias in ["python", "pyt", "pyn", "pythn", "phyton", "py", "py thon", "pthon"] {
            assert_eq!(normalize_language(alias), "python", "alias {alias}");
        }
    }

    #[test]
    fn test_go_aliases() {
        for alias in ["go", "golang", "gol", "goo", "g o", "golangg"] {
            assert_eq!(normalize_language(alias), "go", "alias {alias}");
        }
    }

    #[test]
    fn test_cpp_aliases() {
        for alias in ["cpp", "c++", "cp", "cppp", "c plus", "cxx", "cc"] {
            assert_eq!(normalize_language(alias), "cpp", "alias {alias}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(normalize_language("PyThOn"), "python");
        assert_eq!(normalize_language("GOLANG"), "go");
    }

    #[test]
    fn test_unknown_passes_through_lowercased() {
        assert_eq!(normalize_language("Haskell"), "haskell");
    }

    #[test]
    fn test_escaping_set() {
        assert!(needs_json_escaping("python"));
        assert!(needs_json_escaping("py"));
        assert!(needs_json_escaping("javascript"));
        assert!(needs_json_escaping("js"));
        assert!(!needs_json_escaping("go"));
        assert!(!needs_json_escaping("cpp"));
    }
}

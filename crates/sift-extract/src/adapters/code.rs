//! Source code adapter: language from extension, counts, declarations, and
//! the verbatim source in a fenced block.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use sift_core::{
    extension_of, ExtractionAdapter, ExtractionResult, FileCategory, Result, UploadedFile,
};

use crate::banner;

pub struct CodeAdapter;

/// `(display name, fence tag)` for a code extension.
pub fn language_for(ext: &str) -> (&'static str, &'static str) {
    match ext {
        "rs" => ("Rust", "rust"),
        "py" => ("Python", "python"),
        "js" | "jsx" => ("JavaScript", "javascript"),
        "ts" | "tsx" => ("TypeScript", "typescript"),
        "java" => ("Java", "java"),
        "c" | "h" => ("C", "c"),
        "cpp" | "hpp" => ("C++", "cpp"),
        "cs" => ("C#", "csharp"),
        "go" => ("Go", "go"),
        "rb" => ("Ruby", "ruby"),
        "php" => ("PHP", "php"),
        "swift" => ("Swift", "swift"),
        "kt" => ("Kotlin", "kotlin"),
        "scala" => ("Scala", "scala"),
        "sh" | "bash" => ("Shell", "bash"),
        "sql" => ("SQL", "sql"),
        "html" | "htm" => ("HTML", "html"),
        "css" => ("CSS", "css"),
        "scss" => ("SCSS", "scss"),
        "lua" => ("Lua", "lua"),
        "r" => ("R", "r"),
        "dart" => ("Dart", "dart"),
        "vue" => ("Vue", "vue"),
        _ => ("Plain Text", "text"),
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static RUST_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:unsafe\s+)?(?:fn|struct|enum|trait|impl|mod|type)\b")
});
static PYTHON_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*(?:async\s+)?(?:def|class)\s+\w+"));
static JS_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?(?:function\*?\s+\w+|class\s+\w+|interface\s+\w+|type\s+\w+\s*=|(?:const|let)\s+\w+\s*=\s*(?:async\s*)?(?:\([^)]*\)|\w+)\s*=>)")
});
static GO_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(?:func|type)\s+"));
static JAVA_LIKE_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^\s*(?:(?:public|private|protected|internal|static|final|abstract|sealed|open|data|override)\s+)*(?:class|interface|enum|record|object|struct|fun|func)\s+\w+")
});
static C_LIKE_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^(?:(?:struct|class|enum|union|typedef)\s+\w+|[A-Za-z_][\w:<>\*\s]*\s+\**\w+\s*\([^;]*\)\s*\{?\s*$)")
});
static RUBY_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*(?:def|class|module)\s+\w+"));
static PHP_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^\s*(?:(?:public|private|protected|static|abstract|final)\s+)*(?:function|class|interface|trait)\s+\w+")
});
static LUA_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*(?:local\s+)?function\s+[\w.:]+"));
static SHELL_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*(?:function\s+\w+|\w+\s*\(\)\s*\{)"));
static SQL_DECL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?mi)^\s*create\s+(?:or\s+replace\s+)?(?:table|view|function|procedure|index|trigger)\b")
});
static R_DECL: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^\s*[\w.]+\s*<-\s*function\b"));

fn declaration_pattern(ext: &str) -> Option<&'static Regex> {
    let pattern: &'static Lazy<Regex> = match ext {
        "rs" => &RUST_DECL,
        "py" => &PYTHON_DECL,
        "js" | "jsx" | "ts" | "tsx" | "vue" => &JS_DECL,
        "go" => &GO_DECL,
        "java" | "cs" | "kt" | "scala" | "swift" | "dart" => &JAVA_LIKE_DECL,
        "c" | "h" | "cpp" | "hpp" => &C_LIKE_DECL,
        "rb" => &RUBY_DECL,
        "php" => &PHP_DECL,
        "lua" => &LUA_DECL,
        "sh" | "bash" => &SHELL_DECL,
        "sql" => &SQL_DECL,
        "r" => &R_DECL,
        _ => return None,
    };
    Some(Lazy::force(pattern))
}

/// Top-level declarations found by line patterns; zero for markup and styles.
pub fn count_declarations(source: &str, ext: &str) -> usize {
    declaration_pattern(ext)
        .map(|re| re.find_iter(source).count())
        .unwrap_or(0)
}

#[async_trait]
impl ExtractionAdapter for CodeAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Code
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let ext = extension_of(&file.name).unwrap_or_default();
        let (language, fence) = language_for(&ext);
        let source = String::from_utf8_lossy(&file.data);
        let line_count = source.lines().count();
        let char_count = source.chars().count();
        let declarations = count_declarations(&source, &ext);

        let header = banner::header(
            "💻",
            "Code",
            &file.name,
            &[
                ("Language", language.to_string()),
                ("Lines", line_count.to_string()),
                ("Characters", char_count.to_string()),
                ("Declarations", declarations.to_string()),
            ],
        );
        let content = format!("{}\n\n```{}\n{}\n```", header, fence, source.trim_end());

        Ok(ExtractionResult::extracted(content)
            .with_meta("language", language)
            .with_meta("line_count", line_count)
            .with_meta("char_count", char_count)
            .with_meta("declaration_count", declarations))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "code"
    }
}

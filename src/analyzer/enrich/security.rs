use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::{Enricher, Finding, Severity, line_at};
use crate::types::{ExtractionMode, FileAnalysis, Insights, Result};

struct Rule {
    kind: &'static str,
    message: &'static str,
    pattern: Regex,
}

impl Rule {
    fn new(kind: &'static str, message: &'static str, pattern: &str) -> Self {
        Self {
            kind,
            message,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(
            "sql_injection",
            "Potential SQL injection vulnerability detected. Use parameterized queries.",
            r#"\bexecute\(\s*(?:['"][^'")]*['"]\s*\+|f['"])|cursor\.execute\s*\(\s*[^,)]+\s*%\s*[^,)]+\)"#,
        ),
        Rule::new(
            "command_injection",
            "Potential command injection vulnerability. Avoid string concatenation.",
            r"os\.system\(\s*[^)]*\+|subprocess\.(?:call|run|Popen)\(\s*[^),]*\+|Runtime\.getRuntime\(\)\.exec\(\s*[^)]*\+",
        ),
        Rule::new(
            "hardcoded_secret",
            "Possible hardcoded secret detected. Use environment variables instead.",
            r#"(?i)\b\w*(?:password|passwd|secret|token|api_?key)\w*['"]?\s*[:=]\s*['"][^'"\s]{8,}['"]"#,
        ),
        Rule::new(
            "insecure_hash",
            "Insecure hash algorithm (MD5/SHA1) detected. Use SHA-256 or better.",
            r#"(?i)hashlib\.(?:md5|sha1)\(|MessageDigest\.getInstance\(\s*"(?:md5|sha-?1)"|createHash\(\s*['"](?:md5|sha1)['"]"#,
        ),
    ]
});

/// Pattern-based security issues.
///
/// Produces `{"security_issues": [{"type", "message", "line", "severity"}]}`
/// with types `sql_injection`, `command_injection`, `hardcoded_secret` and
/// `insecure_hash`. Runs on every text file, configuration included.
pub struct SecurityEnricher;

impl SecurityEnricher {
    pub fn detect(content: &str) -> Vec<Finding> {
        let mut findings: Vec<Finding> = RULES
            .iter()
            .flat_map(|rule| {
                rule.pattern.find_iter(content).map(move |found| {
                    Finding::new(
                        rule.kind,
                        rule.message,
                        line_at(content, found.start()),
                        Severity::High,
                    )
                })
            })
            .collect();
        findings.sort_by_key(|f| f.line);
        findings
    }
}

impl Enricher for SecurityEnricher {
    fn name(&self) -> &'static str {
        "security"
    }

    fn enrich(&self, analysis: &FileAnalysis, content: &str) -> Result<Insights> {
        let mut insights = Insights::new();
        if matches!(
            analysis.extraction,
            ExtractionMode::Binary | ExtractionMode::Skipped
        ) {
            return Ok(insights);
        }

        insights.insert(
            "security_issues".to_string(),
            json!(Self::detect(content)),
        );
        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(source: &str) -> Vec<(&'static str, u32)> {
        SecurityEnricher::detect(source)
            .into_iter()
            .map(|f| (f.kind, f.line))
            .collect()
    }

    #[test]
    fn test_python_patterns() {
        let source = r#"import hashlib, os
password = "hunter2hunter2"
cursor.execute("SELECT * FROM users WHERE id = %s" % user_id)
os.system("rm -rf " + path)
digest = hashlib.md5(data)
token = os.environ["TOKEN"]
"#;
        assert_eq!(
            issues(source),
            [
                ("hardcoded_secret", 2),
                ("sql_injection", 3),
                ("command_injection", 4),
                ("insecure_hash", 5),
            ]
        );
    }

    #[test]
    fn test_other_languages() {
        let source = r#"const API_KEY = "sk-live-0123456789";
const hash = crypto.createHash('md5');
MessageDigest md = MessageDigest.getInstance("SHA-1");
db.execute(f"DELETE FROM t WHERE id = {id}")
"#;
        assert_eq!(
            issues(source),
            [
                ("hardcoded_secret", 1),
                ("insecure_hash", 2),
                ("insecure_hash", 3),
                ("sql_injection", 4),
            ]
        );
    }

    #[test]
    fn test_safe_code_is_clean() {
        let source = r#"cursor.execute("SELECT * FROM users WHERE id = ?", (user_id,))
subprocess.run(["ls", "-l"])
if password == "":
    token = read_token()
digest = hashlib.sha256(data)
"#;
        assert!(issues(source).is_empty());
    }

    #[test]
    fn test_binary_records_get_nothing() {
        let analysis = FileAnalysis::empty("a.bin", "unknown", 4, ExtractionMode::Binary);
        assert!(SecurityEnricher.enrich(&analysis, "").unwrap().is_empty());
    }
}

//! String template rendering utilities.

/// Placeholders available to stub templates.
pub struct StubVars;

impl StubVars {
    pub const NAMESPACE_DECLARATION: &'static str = "namespaceDeclaration";
    pub const SOURCE_NAMESPACE: &'static str = "sourceNamespace";
    pub const SOURCE_NAME: &'static str = "sourceName";
    pub const TARGET_SYMBOL: &'static str = "targetSymbol";
    pub const TARGET_NAMESPACE: &'static str = "targetNamespace";
    pub const TARGET_NAME: &'static str = "targetName";
    pub const DEPRECATION_NOTICE: &'static str = "deprecationNotice";
}

/// Placeholders available to report banners.
pub struct ReportVars;

impl ReportVars {
    pub const COMMAND: &'static str = "command";
    pub const INPUT: &'static str = "input";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        let out = render(
            "class {{sourceName}} { {{sourceName}}() {} }",
            &[(StubVars::SOURCE_NAME, "Panel")],
        );
        assert_eq!(out, "class Panel { Panel() {} }");
    }

    #[test]
    fn unknown_placeholders_survive() {
        assert_eq!(render("{{missing}}", &[("other", "x")]), "{{missing}}");
    }
}

//! A single resource block of the emitted template.

/// A property value as it will appear after `key: `.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scalar {
    /// A string. Written plain when YAML reads it back unchanged, quoted otherwise.
    Text(String),
    /// A number or boolean, written as-is.
    Literal(String),
}

impl Scalar {
    fn as_str(&self) -> &str {
        match self {
            Scalar::Text(s) | Scalar::Literal(s) => s,
        }
    }

    fn render(&self) -> String {
        match self {
            Scalar::Text(s) if !reads_back_as_plain(s) => quoted(s),
            Scalar::Text(s) | Scalar::Literal(s) => s.clone(),
        }
    }
}

/// Booleans under YAML 1.1, which the provisioner's parser still honours.
const YAML11_BOOLS: [&str; 8] = ["y", "n", "yes", "no", "on", "off", "true", "false"];

/// True when `s`, written unquoted, parses back as exactly the string `s`.
fn reads_back_as_plain(s: &str) -> bool {
    if s.contains(['\n', '\r']) || YAML11_BOOLS.contains(&s.to_ascii_lowercase().as_str()) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(s),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == s
    )
}

/// A double-quoted scalar. JSON string escapes are valid YAML escapes.
fn quoted(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// One entry under `resources:`. Properties keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock {
    pub id: String,
    /// Nested stack file, relative to the template directory.
    pub template: &'static str,
    properties: Vec<(&'static str, Scalar)>,
    pub depends_on: Option<String>,
}

impl ResourceBlock {
    pub fn new(id: impl Into<String>, template: &'static str) -> Self {
        Self {
            id: id.into(),
            template,
            properties: Vec::new(),
            depends_on: None,
        }
    }

    /// Add a string property. Empty values are dropped rather than written blank.
    pub fn prop(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.properties.push((key, Scalar::Text(value)));
        }
        self
    }

    /// Add a numeric or boolean property, written unquoted.
    pub fn literal(mut self, key: &'static str, value: impl ToString) -> Self {
        self.properties.push((key, Scalar::Literal(value.to_string())));
        self
    }

    /// Add a property only when a value is present.
    pub fn opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.prop(key, v),
            None => self,
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn property_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|(k, _)| *k)
    }

    pub fn render(&self, template_dir: &str, out: &mut String) {
        out.push_str(&format!(
            "\n  {}:\n    type: {template_dir}/{}\n    properties:\n",
            self.id, self.template
        ));
        for (key, value) in &self.properties {
            out.push_str(&format!("      {key}: {}\n", value.render()));
        }
        if let Some(prev) = &self.depends_on {
            out.push_str(&format!("    depends_on: {prev}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(block: &ResourceBlock) -> String {
        let mut out = String::new();
        block.render("heat", &mut out);
        out
    }

    #[test]
    fn renders_properties_in_order() {
        let mut block = ResourceBlock::new("n1-nova-srpoa1", "stack-sr.yaml")
            .prop("tmpl-name", "n1-nova-srpoa1")
            .literal("mtu", 1400);
        block.depends_on = Some("n1-nova-sr1-cluster1".to_string());

        assert_eq!(
            rendered(&block),
            "\n  n1-nova-srpoa1:\n    type: heat/stack-sr.yaml\n    properties:\n      \
             tmpl-name: n1-nova-srpoa1\n      mtu: 1400\n    depends_on: n1-nova-sr1-cluster1\n"
        );
    }

    #[test]
    fn empty_and_missing_values_are_omitted() {
        let block = ResourceBlock::new("x", "stack-sr.yaml")
            .prop("sfid-parent-domain", "")
            .opt("security-group-mgmt", None)
            .opt("network-data", Some("data-net"));
        assert_eq!(block.property_keys().collect::<Vec<_>>(), ["network-data"]);
        assert_eq!(block.property("network-data"), Some("data-net"));
    }

    #[test]
    fn addresses_and_zones_stay_plain() {
        for value in ["10.20.3.", "10.20.0.0/16", "nova:m1", "flame.example", "Ab3dEf6hIj9k"] {
            assert!(reads_back_as_plain(value), "{value}");
        }
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        let block = ResourceBlock::new("x", "stack-sr.yaml")
            .prop("node-passwd", "123456789012")
            .prop("base-key", "Abcdefghijk:")
            .prop("sfid-parent-domain", "corp: example")
            .prop("tmpl-name", "true")
            .prop("zone", "a #b")
            .prop("network-data", "On")
            .literal("enable-ipv4-rules", "true");
        let out = rendered(&block);
        assert!(out.contains("      node-passwd: \"123456789012\"\n"));
        assert!(out.contains("      base-key: \"Abcdefghijk:\"\n"));
        assert!(out.contains("      sfid-parent-domain: \"corp: example\"\n"));
        assert!(out.contains("      tmpl-name: \"true\"\n"));
        assert!(out.contains("      zone: \"a #b\"\n"));
        assert!(out.contains("      network-data: \"On\"\n"));
        assert!(out.contains("      enable-ipv4-rules: true\n"));
        assert_eq!(block.property("node-passwd"), Some("123456789012"));
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        let block = ResourceBlock::new("x", "stack-sr.yaml").prop("node-passwd", "a\"b\\c:");
        let doc: serde_yaml::Value = serde_yaml::from_str(&rendered(&block)).unwrap();
        assert_eq!(
            doc["x"]["properties"]["node-passwd"],
            serde_yaml::Value::String("a\"b\\c:".to_string())
        );
    }
}

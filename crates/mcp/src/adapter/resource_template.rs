//! Maps templated resource URIs onto the positional/flag invocation model.

use cmdbridge_types::{ExecutionConfig, ResourceTemplateConfig};
use percent_encoding::percent_decode_str;
use serde_json::Value;

use super::errors::AdapterError;

/// Path segments of `uri` after the scheme, query and fragment removed.
///
/// The first segment is the resource kind.
pub fn uri_segments(uri: &str) -> Vec<String> {
    let path = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}

/// Build the execution config a read of `uri` stands for.
///
/// `uri_to_args` indices address segments after the resource kind and name
/// the positional slot the value lands in. Unaddressed lower slots are
/// filled with empty strings and trailing empty slots are trimmed.
pub fn resolve(uri: &str, config: &ResourceTemplateConfig) -> Result<ExecutionConfig, AdapterError> {
    let segments = uri_segments(uri);
    let segment_at = |position: usize| segments.get(position + 1).filter(|segment| !segment.is_empty()).cloned();

    let mut slots: Vec<(usize, String)> = Vec::with_capacity(config.uri_to_args.len());
    for (var, raw_index) in &config.uri_to_args {
        let index: usize = raw_index.trim().parse().map_err(|_| {
            AdapterError::internal(
                config.command_id.as_str(),
                format!("invalid argument index '{raw_index}' for uri variable '{var}' in template '{}'", config.name),
            )
        })?;
        if let Some(value) = segment_at(index) {
            slots.push((index, value));
        }
    }

    let mut positional = vec![String::new(); slots.iter().map(|(index, _)| index + 1).max().unwrap_or(0)];
    for (index, value) in slots {
        positional[index] = value;
    }
    while positional.last().is_some_and(String::is_empty) {
        positional.pop();
    }

    let mut execution = ExecutionConfig::new(config.command_id.clone());
    execution.fixed_flags = config.fixed_flags.clone();
    execution.positional_args = positional;

    for (var, flag) in &config.uri_to_flags {
        let position = config.variable_position(var).ok_or_else(|| {
            AdapterError::internal(
                config.command_id.as_str(),
                format!("uri variable '{var}' does not appear in template '{}'", config.uri_template),
            )
        })?;
        if let Some(value) = segment_at(position) {
            execution.flag_values.insert(flag.clone(), Value::String(value));
        }
    }

    Ok(execution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::collections::BTreeMap;

    fn template(uri_template: &str, args: &[(&str, &str)], flags: &[(&str, &str)]) -> ResourceTemplateConfig {
        ResourceTemplateConfig {
            uri_template: uri_template.to_string(),
            name: "test".into(),
            description: String::new(),
            mime_type: None,
            command_id: "config".into(),
            fixed_flags: BTreeMap::from([("format".to_string(), "yaml".to_string())]),
            uri_to_args: args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<IndexMap<_, _>>(),
            uri_to_flags: flags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn single_segment_becomes_first_positional() {
        let config = template("juju://config-doc/{app}", &[("app", "0")], &[]);
        let execution = resolve("juju://config-doc/myapp", &config).unwrap();
        assert_eq!(execution.positional_args, vec!["myapp"]);
        assert_eq!(execution.fixed_flags["format"], "yaml");
        assert_eq!(execution.command_id.as_str(), "config");
    }

    #[test]
    fn gaps_are_filled_and_trailing_empties_trimmed() {
        let config = template("juju://res/{a}/{b}/{c}", &[("a", "0"), ("c", "2")], &[]);
        assert_eq!(resolve("juju://res/x/y/z", &config).unwrap().positional_args, vec!["x", "", "z"]);
        assert_eq!(resolve("juju://res/x/y", &config).unwrap().positional_args, vec!["x"]);
        assert!(resolve("juju://res", &config).unwrap().positional_args.is_empty());
    }

    #[test]
    fn empty_segment_omits_slot() {
        let config = template("juju://res/{a}/{b}", &[("a", "0"), ("b", "1")], &[]);
        assert_eq!(resolve("juju://res//bar", &config).unwrap().positional_args, vec!["", "bar"]);
    }

    #[test]
    fn malformed_index_is_internal_configuration() {
        let config = template("juju://config-doc/{app}", &[("app", "abc")], &[]);
        let error = resolve("juju://config-doc/myapp", &config).unwrap_err();
        assert!(matches!(error, AdapterError::InternalConfiguration { .. }), "{error:?}");
    }

    #[test]
    fn uri_flags_follow_template_position() {
        let config = template("juju://models-doc/{controller}", &[], &[("controller", "controller")]);
        let execution = resolve("juju://models-doc/prod", &config).unwrap();
        assert_eq!(execution.flag_values["controller"], Value::String("prod".into()));
        assert!(execution.positional_args.is_empty());
    }

    #[test]
    fn segments_are_percent_decoded() {
        let config = template("juju://config-doc/{app}", &[("app", "0")], &[]);
        let execution = resolve("juju://config-doc/my%20app?x=1", &config).unwrap();
        assert_eq!(execution.positional_args, vec!["my app"]);
    }
}

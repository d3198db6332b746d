use std::collections::BTreeSet;

use cmdbridge_registry::{Command, FlagSet};
use cmdbridge_types::{ARGS_PARAMETER, ParameterSchema, ToolParameter};

/// Derive the parameter schema published for `command`.
///
/// The positional `args` parameter always comes first, followed by every
/// declared flag not listed in `disabled`, in declaration order. A flag that
/// happens to be called `args` is shadowed by the positional parameter.
pub fn build_schema(command: &dyn Command, disabled: &BTreeSet<String>) -> ParameterSchema {
    let mut flags = FlagSet::new(command.name());
    command.set_flags(&mut flags);

    let mut parameters = vec![ToolParameter::positional_args()];
    parameters.extend(
        flags
            .descriptors()
            .filter(|descriptor| descriptor.name != ARGS_PARAMETER && !disabled.contains(&descriptor.name))
            .map(ToolParameter::from_flag),
    );
    ParameterSchema { parameters }
}

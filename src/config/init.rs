// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a commented lamsync.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FunctionName;

use super::{CONFIG_FILENAME, DEFAULT_HANDLER, DEFAULT_MEMORY, DEFAULT_RUNTIME, DEFAULT_TIMEOUT};

pub fn init_config(
    dir: &Path,
    function: Option<&str>,
    role: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let function = FunctionName::new(function.unwrap_or("my-function"))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let yaml = generate_template_yaml(&function, role);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(function: &FunctionName, role: Option<&str>) -> String {
    let role_line = match role {
        Some(role) => format!("role: {role}"),
        None => "# role: arn:aws:iam::123456789012:role/my-function-role".to_string(),
    };

    format!(
        r#"function: {function}
# Required only when the function does not exist yet.
{role_line}

# handler: {DEFAULT_HANDLER}
# runtime: {DEFAULT_RUNTIME}
# timeout: {DEFAULT_TIMEOUT}
# memory: {DEFAULT_MEMORY}

source: .
include:
  - index.js

# environment:
#   STAGE: production
#   API_KEY: {{ from_env: API_KEY }}

# triggers:
#   - queue: arn:aws:sqs:us-east-1:123456789012:my-queue
#     batch_size: 10
"#
    )
}

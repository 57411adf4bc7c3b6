//! `bundler cart-transform` -- the function runner contract on stdin/stdout.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use bundler_core::cart_transform;

/// Read the cart input, expand it, and write the operations to stdout.
pub async fn run(input: Option<&Path>, pretty: bool) -> Result<()> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read cart input from stdin")?;
            buf
        }
    };

    let output = cart_transform::run(&raw).context("Cart transform failed")?;
    let output = if pretty { prettify(&output)? } else { output };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

fn prettify(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_keeps_content() {
        let pretty = prettify(r#"{"operations":[]}"#).unwrap();
        assert!(pretty.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(value, serde_json::json!({"operations": []}));
    }
}

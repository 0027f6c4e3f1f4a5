//! Translation relay: precondition checks, script invocation, and outcome mapping

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info};

use crate::{
    config::Config,
    errors::AppError,
    translator::{ProcessInvocation, ProcessOutput},
    AppState,
};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_language_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_language_code: String,
}

#[derive(Debug, Serialize)]
pub struct TranslationResponse {
    pub translated_text: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub async fn translate(
    state: &AppState,
    request: &TranslationRequest,
) -> Result<TranslationResponse, AppError> {
    let invocation = prepare_invocation(&state.config, request).await?;
    info!(command = %invocation.command_line(), "executing translation command");

    let output = state.runner.run(&invocation).await?;
    info!(
        exit_code = ?output.exit_code,
        stdout = %output.stdout,
        stderr = %output.stderr,
        "translation command finished"
    );

    let response = into_response(output)?;
    info!(translated_text = %response.translated_text, "translation successful");
    Ok(response)
}

/// Checks that the project directory and script exist, then builds the invocation.
pub async fn prepare_invocation(
    config: &Config,
    request: &TranslationRequest,
) -> Result<ProcessInvocation, AppError> {
    if !path_exists(&config.riva_dir).await {
        error!(riva_dir = %config.riva_dir.display(), "Riva directory not found");
        return Err(AppError::RivaDirectoryNotFound);
    }

    let script_path = config.script_path();
    if !path_exists(&script_path).await {
        error!(script_path = %script_path.display(), "NMT script not found");
        return Err(AppError::ScriptNotFound);
    }

    Ok(ProcessInvocation {
        program: config.interpreter.clone(),
        args: vec![
            script_path.display().to_string(),
            "--server".to_string(),
            config.nmt_server.clone(),
            "--text".to_string(),
            request.text.clone(),
            "--source-language-code".to_string(),
            request.source_language_code.clone(),
            "--target-language-code".to_string(),
            request.target_language_code.clone(),
        ],
        working_dir: config.riva_dir.clone(),
        timeout: config.timeout,
    })
}

pub fn into_response(output: ProcessOutput) -> Result<TranslationResponse, AppError> {
    if output.succeeded() {
        Ok(TranslationResponse {
            translated_text: output.stdout.trim().to_string(),
        })
    } else {
        error!(exit_code = ?output.exit_code, "translation failed");
        Err(AppError::translation_failed(&output.stderr))
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;

    fn config_with_dir(dir: PathBuf) -> Config {
        let dir = dir.display().to_string();
        Config::from_lookup(|key| match key {
            "RIVA_DIR" => Some(dir.clone()),
            _ => None,
        })
        .expect("config should parse")
    }

    fn project_dir(name: &str, with_script: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nmt-relay-domain-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("backend")).expect("create project dir");
        if with_script {
            fs::write(dir.join("backend/nmt.py"), "print('hi')\n").expect("write script");
        }
        dir
    }

    fn request() -> TranslationRequest {
        TranslationRequest {
            text: "Hello, world".to_string(),
            source_language_code: "en".to_string(),
            target_language_code: "fr".to_string(),
        }
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        let parsed: TranslationRequest =
            serde_json::from_str(r#"{"text":null,"target_language_code":"de"}"#)
                .expect("valid request");
        assert_eq!(parsed.text, "");
        assert_eq!(parsed.source_language_code, "");
        assert_eq!(parsed.target_language_code, "de");
    }

    #[test]
    fn non_string_field_is_rejected() {
        let parsed = serde_json::from_str::<TranslationRequest>(r#"{"text":42}"#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn invocation_orders_flags_after_script() {
        let dir = project_dir("order", true);
        let config = config_with_dir(dir.clone());

        let invocation = prepare_invocation(&config, &request())
            .await
            .expect("invocation");

        assert_eq!(invocation.program, "python3");
        assert_eq!(invocation.working_dir, dir);
        assert_eq!(invocation.timeout, config.timeout);
        assert_eq!(
            invocation.args,
            vec![
                dir.join("backend/nmt.py").display().to_string(),
                "--server".to_string(),
                "0.0.0.0:50051".to_string(),
                "--text".to_string(),
                "Hello, world".to_string(),
                "--source-language-code".to_string(),
                "en".to_string(),
                "--target-language-code".to_string(),
                "fr".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_directory_is_reported_first() {
        let dir = std::env::temp_dir().join(format!(
            "nmt-relay-domain-{}-absent",
            std::process::id()
        ));
        let config = config_with_dir(dir);

        let err = prepare_invocation(&config, &request())
            .await
            .expect_err("expected missing directory");
        assert!(matches!(err, AppError::RivaDirectoryNotFound));
    }

    #[tokio::test]
    async fn missing_script_is_reported() {
        let dir = project_dir("no-script", false);
        let config = config_with_dir(dir);

        let err = prepare_invocation(&config, &request())
            .await
            .expect_err("expected missing script");
        assert!(matches!(err, AppError::ScriptNotFound));
    }

    #[test]
    fn success_trims_stdout() {
        let response = into_response(ProcessOutput {
            exit_code: Some(0),
            stdout: "  Bonjour\n\n".to_string(),
            stderr: "warning: ignored\n".to_string(),
        })
        .expect("success");
        assert_eq!(response.translated_text, "Bonjour");
    }

    #[test]
    fn signal_termination_is_a_failure() {
        let err = into_response(ProcessOutput {
            exit_code: None,
            stdout: "partial".to_string(),
            stderr: "killed\n".to_string(),
        })
        .expect_err("expected failure");
        assert!(matches!(err, AppError::TranslationFailed { ref stderr } if stderr == "killed"));
    }
}

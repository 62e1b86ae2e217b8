use crate::{
    container::DeleteMode,
    error::{AcademiaError, AcademiaResult, BadEnvVarSnafu},
};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, sync::Arc};

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_ip: Arc<str>,
}

impl RuntimeConfiguration {
    pub fn new() -> AcademiaResult<Self> {
        let server_ip = optional_env_var("ACADEMIA_SERVER_IP")?
            .unwrap_or_else(|| DEFAULT_SERVER_IP.to_string());

        Ok(Self {
            api_config: Arc::new(ApiConfig::new()?),
            server_ip: server_ip.into(),
        })
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
    student_delete_mode: DeleteMode,
}

impl ApiConfig {
    pub fn new() -> AcademiaResult<Self> {
        let base_url =
            optional_env_var("ACADEMIA_API_URL")?.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let student_delete_mode = match optional_env_var("ACADEMIA_STUDENT_DELETE")? {
            Some(provided) => {
                provided
                    .parse()
                    .map_err(|()| AcademiaError::BadConfigValue {
                        name: "ACADEMIA_STUDENT_DELETE",
                        provided,
                    })?
            }
            None => DeleteMode::default(),
        };

        Ok(Self::from_parts(base_url, student_delete_mode))
    }

    pub fn from_parts(base_url: impl Into<String>, student_delete_mode: DeleteMode) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            student_delete_mode,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn student_delete_mode(&self) -> DeleteMode {
        self.student_delete_mode
    }
}

///`Ok(None)` when the variable simply isn't set
fn optional_env_var(name: &'static str) -> AcademiaResult<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(e) => Err(e).context(BadEnvVarSnafu { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        let config = ApiConfig::from_parts("http://localhost:8000/api//", DeleteMode::Hard);
        assert_eq!(config.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn delete_mode_parses_known_values() {
        assert_eq!("soft".parse::<DeleteMode>(), Ok(DeleteMode::SoftStatus));
        assert_eq!(" HARD ".parse::<DeleteMode>(), Ok(DeleteMode::Hard));
        assert_eq!("sometimes".parse::<DeleteMode>(), Err(()));
    }
}

use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{App, ServiceInstance, ServiceSummary, Session};
use crate::cloud_controller::{AppEntity, ResourceList, ServiceInstanceEntity, SpaceSummary};
use crate::error::{Error, Result};
use crate::transport::{ClientOptions, JsonClient, ReqwestClient};

/// The subset of the cf CLI's `config.json` this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CfConfig {
    #[serde(rename = "AccessToken")]
    pub access_token: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "SSLDisabled")]
    pub ssl_disabled: bool,
    #[serde(rename = "SpaceFields")]
    pub space: SpaceFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpaceFields {
    #[serde(rename = "GUID")]
    pub guid: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl CfConfig {
    /// Location of `config.json`: `cf_home` if given, else `$CF_HOME`, else `~`
    pub fn path(cf_home: Option<&Path>) -> Result<PathBuf> {
        let home = match cf_home {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os("CF_HOME") {
                Some(dir) => PathBuf::from(dir),
                None => dirs::home_dir().ok_or_else(|| Error::SessionConfig {
                    path: PathBuf::from("~/.cf/config.json"),
                    message: "couldn't determine home directory".to_string(),
                })?,
            },
        };
        Ok(home.join(".cf").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let session_error = |message: String| Error::SessionConfig {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| session_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| session_error(e.to_string()))
    }
}

/// [`Session`] backed by the cf CLI config and the Cloud Controller v2 API
pub struct CfSession {
    config: CfConfig,
    client: JsonClient,
}

impl CfSession {
    /// Read the cf CLI config and build an HTTP client that honours its TLS setting
    pub fn load(cf_home: Option<&Path>, options: &ClientOptions) -> Result<Self> {
        let path = CfConfig::path(cf_home)?;
        let config = CfConfig::load(&path)?;
        log::debug!("Loaded cf session from {}", path.display());

        let options = ClientOptions {
            skip_ssl_validation: options.skip_ssl_validation || config.ssl_disabled,
            ..options.clone()
        };
        let http = ReqwestClient::new(&options)?;
        let client = JsonClient::new(Box::new(http), config.access_token.clone());

        Ok(CfSession { config, client })
    }

    pub fn with_client(config: CfConfig, client: JsonClient) -> Self {
        CfSession { config, client }
    }

    fn space_url(&self, suffix: &str, name_filter: Option<&str>) -> Result<Url> {
        if self.config.space.guid.is_empty() {
            return Err(Error::NoTargetSpace);
        }

        let mut url = Url::parse(&self.config.target).map_err(|_| Error::InvalidApiUrl {
            url: self.config.target.clone(),
        })?;
        url.set_path(&format!("/v2/spaces/{}/{}", self.config.space.guid, suffix));
        if let Some(name) = name_filter {
            url.query_pairs_mut().append_pair("q", &format!("name:{name}"));
        }
        Ok(url)
    }

    /// GET a Cloud Controller resource; a 401 means the stored token is stale
    fn lookup<R: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<R> {
        self.client.get(url.as_str()).map_err(|e| match e {
            Error::Remote { status: 401, .. } => Error::SessionExpired,
            other => other,
        })
    }
}

impl Session for CfSession {
    fn is_logged_in(&self) -> Result<bool> {
        Ok(!self.config.access_token.is_empty() && !self.config.target.is_empty())
    }

    fn access_token(&self) -> Result<String> {
        if self.config.access_token.is_empty() {
            return Err(Error::AccessToken("no access token in session".to_string()));
        }
        Ok(self.config.access_token.clone())
    }

    fn api_endpoint(&self) -> Result<String> {
        if self.config.target.is_empty() {
            return Err(Error::ApiEndpoint("no API endpoint targeted".to_string()));
        }
        Ok(self.config.target.clone())
    }

    fn is_ssl_disabled(&self) -> Result<bool> {
        Ok(self.config.ssl_disabled)
    }

    fn get_app(&self, name: &str) -> Result<App> {
        let url = self.space_url("apps", Some(name))?;
        let apps: ResourceList<AppEntity> = self.lookup(&url).map_err(|e| Error::AppLookup {
            name: name.to_string(),
            source: Box::new(e),
        })?;

        let app = apps
            .resources
            .into_iter()
            .next()
            .ok_or_else(|| Error::AppNotFound {
                name: name.to_string(),
            })?;

        Ok(App {
            guid: app.metadata.guid,
            name: app.entity.name,
        })
    }

    fn get_services(&self) -> Result<Vec<ServiceSummary>> {
        let url = self.space_url("summary", None)?;
        let summary: SpaceSummary = self.lookup(&url)?;

        Ok(summary
            .services
            .into_iter()
            .map(|s| ServiceSummary {
                name: s.name,
                offering: s.service_plan.map(|p| p.service.label).unwrap_or_default(),
            })
            .collect())
    }

    fn get_service(&self, name: &str) -> Result<ServiceInstance> {
        let url = self.space_url("service_instances", Some(name))?;
        let instances: ResourceList<ServiceInstanceEntity> =
            self.lookup(&url).map_err(|e| Error::ServiceLookup {
                name: name.to_string(),
                source: Box::new(e),
            })?;

        let instance = instances
            .resources
            .into_iter()
            .next()
            .ok_or_else(|| Error::ServiceNotFound {
                name: name.to_string(),
            })?;

        Ok(ServiceInstance {
            guid: instance.metadata.guid,
            name: instance.entity.name,
            dashboard_url: instance.entity.dashboard_url.unwrap_or_default(),
        })
    }
}

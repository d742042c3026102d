use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use fqc_portal::{
    EditAck, EditFeature, FeatureLayer, LayerInfo, Portal, PortalError, WebMapInfo,
};
use fqc_schemas::FeatureRecord;

use crate::parse;

/// Token lifetime requested at sign-in, minutes. A full QC pass over one
/// portal finishes well inside this window.
const TOKEN_EXPIRATION_MINUTES: u32 = 480;

// ---------------------------------------------------------------------------
// Portal session
// ---------------------------------------------------------------------------

/// Authenticated session against one ArcGIS portal.
pub struct ArcgisPortal {
    http: Client,
    base_url: String,
    token: String,
}

fn api_error(body: &Value) -> Option<PortalError> {
    let err = body.get("error")?;
    let code = err.get("code").and_then(Value::as_i64);
    let mut message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown portal error")
        .to_string();
    if let Some(details) = err.get("details").and_then(Value::as_array) {
        for d in details.iter().filter_map(Value::as_str) {
            message.push_str(": ");
            message.push_str(d);
        }
    }
    Some(PortalError::Api { code, message })
}

fn decode_body(resp: reqwest::blocking::Response) -> Result<Value, PortalError> {
    let body: Value = resp
        .json()
        .map_err(|e| PortalError::Decode(e.to_string()))?;
    match api_error(&body) {
        Some(err) => Err(err),
        None => Ok(body),
    }
}

impl ArcgisPortal {
    /// Sign in with named-user credentials and hold the returned token for
    /// the rest of the session. No refresh; see [`TOKEN_EXPIRATION_MINUTES`].
    pub fn connect(base_url: &str, username: &str, password: &str) -> Result<ArcgisPortal, PortalError> {
        let http = Client::builder()
            .build()
            .map_err(|e| PortalError::Transport(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let url = format!("{base_url}/sharing/rest/generateToken");
        debug!(url = %url, username, "requesting portal token");
        let resp = http
            .post(&url)
            .form(&[
                ("f", "json"),
                ("username", username),
                ("password", password),
                ("referer", base_url.as_str()),
                ("expiration", &TOKEN_EXPIRATION_MINUTES.to_string()),
            ])
            .send()
            .map_err(|e| PortalError::Transport(e.to_string()))?;

        let body = decode_body(resp).map_err(|e| match e {
            PortalError::Api { message, .. } => PortalError::Auth(message),
            other => other,
        })?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| PortalError::Auth("token missing from sign-in response".to_string()))?
            .to_string();

        Ok(ArcgisPortal {
            http,
            base_url,
            token,
        })
    }

    fn get_json(&self, url: &str, extra: &[(&str, &str)]) -> Result<Value, PortalError> {
        debug!(url = %url, "portal GET");
        let mut query: Vec<(&str, &str)> = vec![("f", "json"), ("token", self.token.as_str())];
        query.extend_from_slice(extra);
        let resp = self
            .http
            .get(url)
            .query(&query)
            .send()
            .map_err(|e| PortalError::Transport(e.to_string()))?;
        decode_body(resp)
    }

    fn item_info(&self, item_id: &str) -> Result<Value, PortalError> {
        self.get_json(
            &format!("{}/sharing/rest/content/items/{item_id}", self.base_url),
            &[],
        )
    }
}

impl Portal for ArcgisPortal {
    fn name(&self) -> &'static str {
        "arcgis"
    }

    fn open_map(&self, map_id: &str) -> Result<WebMapInfo, PortalError> {
        let item = self.item_info(map_id)?;
        let title = item
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| PortalError::Decode("webmap item without title".to_string()))?
            .to_string();

        let data = self.get_json(
            &format!("{}/sharing/rest/content/items/{map_id}/data", self.base_url),
            &[],
        )?;
        let mut layers = Vec::new();
        for layer in data
            .get("operationalLayers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            let layer_title = layer.get("title").and_then(Value::as_str).unwrap_or("");
            match layer.get("itemId").and_then(Value::as_str) {
                Some(item_id) => layers.push(LayerInfo {
                    title: layer_title.to_string(),
                    item_id: item_id.to_string(),
                }),
                // Basemap references and map notes carry no item id.
                None => warn!(map = %title, layer = %layer_title, "operational layer without item id, skipping"),
            }
        }

        Ok(WebMapInfo {
            id: map_id.to_string(),
            title,
            layers,
        })
    }

    fn open_layer(&self, item_id: &str) -> Result<Box<dyn FeatureLayer>, PortalError> {
        let item = self.item_info(item_id)?;
        let title = item
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| PortalError::Decode("layer item without title".to_string()))?
            .to_string();
        let service_url = item
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| PortalError::Decode("layer item without service url".to_string()))?
            .trim_end_matches('/')
            .to_string();

        Ok(Box::new(ArcgisLayer {
            http: self.http.clone(),
            token: self.token.clone(),
            title,
            // Every survey service publishes its feature layer at index 0.
            layer_url: format!("{service_url}/0"),
        }))
    }
}

// ---------------------------------------------------------------------------
// Feature layer
// ---------------------------------------------------------------------------

/// Query/edit handle for one hosted feature layer.
pub struct ArcgisLayer {
    http: Client,
    token: String,
    title: String,
    layer_url: String,
}

impl ArcgisLayer {
    fn get_json(&self, url: &str, extra: &[(&str, &str)]) -> Result<Value, PortalError> {
        debug!(url = %url, "layer GET");
        let mut query: Vec<(&str, &str)> = vec![("f", "json"), ("token", self.token.as_str())];
        query.extend_from_slice(extra);
        let resp = self
            .http
            .get(url)
            .query(&query)
            .send()
            .map_err(|e| PortalError::Transport(e.to_string()))?;
        decode_body(resp)
    }
}

fn ack(v: &Value) -> EditAck {
    EditAck {
        object_id: v.get("objectId").and_then(Value::as_i64),
        global_id: v
            .get("globalId")
            .and_then(Value::as_str)
            .map(str::to_string),
        success: v.get("success").and_then(Value::as_bool).unwrap_or(false),
    }
}

impl FeatureLayer for ArcgisLayer {
    fn title(&self) -> &str {
        &self.title
    }

    fn query_features(&self) -> Result<Vec<FeatureRecord>, PortalError> {
        let body = self.get_json(
            &format!("{}/query", self.layer_url),
            &[
                ("where", "1=1"),
                ("outFields", "*"),
                ("returnGeometry", "true"),
            ],
        )?;
        body.get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(parse::feature_record)
            .collect()
    }

    fn attachment_parents(&self) -> Result<Vec<String>, PortalError> {
        let body = self.get_json(
            &format!("{}/queryAttachments", self.layer_url),
            &[("definitionExpression", "1=1"), ("returnUrl", "false")],
        )?;
        Ok(body
            .get("attachmentGroups")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|g| g.get("parentGlobalId").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    fn apply_edits(
        &self,
        adds: &[EditFeature],
        updates: &[EditFeature],
    ) -> Result<Vec<EditAck>, PortalError> {
        let adds_json =
            serde_json::to_string(adds).map_err(|e| PortalError::Decode(e.to_string()))?;
        let updates_json =
            serde_json::to_string(updates).map_err(|e| PortalError::Decode(e.to_string()))?;

        let url = format!("{}/applyEdits", self.layer_url);
        debug!(url = %url, adds = adds.len(), updates = updates.len(), "layer applyEdits");
        let resp = self
            .http
            .post(&url)
            .form(&[
                ("f", "json"),
                ("token", self.token.as_str()),
                ("adds", adds_json.as_str()),
                ("updates", updates_json.as_str()),
            ])
            .send()
            .map_err(|e| PortalError::Transport(e.to_string()))?;
        let body = decode_body(resp)?;

        let mut acks = Vec::with_capacity(adds.len() + updates.len());
        for key in ["addResults", "updateResults"] {
            for r in body
                .get(key)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
            {
                acks.push(ack(r));
            }
        }
        Ok(acks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

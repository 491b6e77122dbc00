// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The `utils` surface exposed in the launcher namespace

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use super::config::LauncherConfig;
use super::logger::Logger;
use super::module::{Launcher, Module};
use crate::error::Result;
use crate::hook::{install_hook, HookBinding, JsValue, MethodTable};
use crate::network::{install_header_watch, HeaderWatch, XhrPrototype};
use crate::utils::{self, CookieJar, DocumentCookies, JsonStorage, StorageArea, StorageKind};

/// Namespace key the surface is installed under
pub const UTILS_KEY: &str = "utils";

/// Helper functions available to other modules while `utils` is active
pub struct Utils {
    config: LauncherConfig,
    logger: Arc<dyn Logger>,
    prototype: Arc<XhrPrototype>,
    location: Url,
    cookies: DocumentCookies,
    local_storage: JsonStorage,
    session_storage: JsonStorage,
}

impl Utils {
    /// Build the surface for `config`, patching the process-wide XHR prototype
    pub fn new(config: LauncherConfig, logger: Arc<dyn Logger>) -> Result<Self> {
        Self::with_prototype(config, logger, XhrPrototype::global())
    }

    /// Build the surface against a specific XHR prototype
    pub fn with_prototype(
        config: LauncherConfig,
        logger: Arc<dyn Logger>,
        prototype: Arc<XhrPrototype>,
    ) -> Result<Self> {
        let location = Url::parse(&config.document_url)?;
        let cookies = DocumentCookies::with_jar(location.clone(), CookieJar::new());

        let area = || match config.storage_quota {
            Some(bytes) => StorageArea::with_quota(bytes),
            None => StorageArea::new(),
        };
        let local_storage = JsonStorage::new(StorageKind::Local, area(), logger.clone());
        let session_storage = JsonStorage::new(StorageKind::Session, area(), logger.clone());

        Ok(Self {
            config,
            logger,
            prototype,
            location,
            cookies,
            local_storage,
            session_storage,
        })
    }

    /// Hook `name` on `target`; `observer` sees every completed call.
    ///
    /// There is no way to take the patch back. It stays in place after the
    /// module is deactivated.
    pub fn patch_function<R, F>(
        &self,
        target: &MethodTable<R>,
        name: &str,
        observer: F,
    ) -> HookBinding<R>
    where
        R: 'static,
        F: Fn(&JsValue, &[JsValue]) -> Result<()> + Send + Sync + 'static,
    {
        install_hook(target, name, observer)
    }

    /// Decode a JWT payload and log it
    pub fn decode_jwt(&self, token: &str) -> Result<Value> {
        let payload = utils::decode_payload(token)?;
        self.logger.log("Decoded JWT:", Some(&payload));
        Ok(payload)
    }

    /// Log the value of the next `header` assigned on any request
    pub fn intercept_header(&self, header: &str) -> HeaderWatch {
        let message = format!("Intercepted {} header:", header);
        self.watch(header, message)
    }

    /// Log the value of the next authorization header assigned on any request
    pub fn intercept_authorization_header(&self) -> HeaderWatch {
        self.watch(&self.config.auth_header, "Here is your auth code:".to_string())
    }

    fn watch(&self, header: &str, message: String) -> HeaderWatch {
        let logger = self.logger.clone();
        install_header_watch(&self.prototype, header, move |value| {
            logger.log(&message, Some(&Value::String(value.to_string())));
        })
    }

    /// CSP nonce from the policy `<meta>` tag of `html`
    pub fn nonce_from_csp(&self, html: &str) -> Option<String> {
        utils::nonce_from_html(html)
    }

    /// `document.cookie` helpers for the document location
    pub fn cookies(&self) -> &DocumentCookies {
        &self.cookies
    }

    /// Query parameter `name` of the document location
    pub fn query_variable(&self, name: &str) -> Option<String> {
        utils::query_variable_from_location(&self.location, name)
    }

    /// Query parameter `name` of `url`
    pub fn query_variable_from_url(&self, url: &str, name: &str) -> Option<String> {
        utils::query_variable(url, name)
    }

    /// All query parameters of `url`
    pub fn query_params(&self, url: &str) -> BTreeMap<String, String> {
        utils::query_params(url)
    }

    /// Logging JSON wrapper over localStorage
    pub fn local_storage(&self) -> &JsonStorage {
        &self.local_storage
    }

    /// Logging JSON wrapper over sessionStorage
    pub fn session_storage(&self) -> &JsonStorage {
        &self.session_storage
    }

    /// Document location
    pub fn location(&self) -> &Url {
        &self.location
    }
}

impl fmt::Debug for Utils {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utils")
            .field("launcher", &self.config.name)
            .field("location", &self.location.as_str())
            .finish()
    }
}

/// Module installing [`Utils`] under `"utils"`
#[derive(Debug, Default)]
pub struct UtilsModule {
    prototype: Option<Arc<XhrPrototype>>,
}

impl UtilsModule {
    /// Module patching the process-wide XHR prototype
    pub fn new() -> Self {
        Self::default()
    }

    /// Module patching `prototype` instead of the global one
    pub fn with_prototype(prototype: Arc<XhrPrototype>) -> Self {
        Self {
            prototype: Some(prototype),
        }
    }
}

impl Module for UtilsModule {
    fn activate(&self, launcher: &Launcher) -> Result<()> {
        let prototype = self.prototype.clone().unwrap_or_else(XhrPrototype::global);
        let utils = Utils::with_prototype(launcher.config().clone(), launcher.logger(), prototype)?;
        launcher.namespace().insert(UTILS_KEY, Arc::new(utils));
        Ok(())
    }

    fn deactivate(&self, launcher: &Launcher) -> Result<()> {
        launcher.namespace().remove(UTILS_KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{HostObject, Outcome};
    use crate::launcher::BufferedLogger;
    use crate::network::XmlHttpRequest;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use parking_lot::Mutex;

    fn setup(config: LauncherConfig) -> (Launcher, BufferedLogger, Arc<XhrPrototype>) {
        let logger = BufferedLogger::new();
        let prototype = Arc::new(XhrPrototype::new());
        let launcher = Launcher::new(config, Arc::new(logger.clone())).unwrap();
        launcher
            .add_module("utils", UtilsModule::with_prototype(prototype.clone()))
            .unwrap();
        (launcher, logger, prototype)
    }

    fn utils(launcher: &Launcher) -> Arc<Utils> {
        launcher.namespace().get::<Utils>(UTILS_KEY).unwrap()
    }

    fn opened(prototype: &Arc<XhrPrototype>) -> XmlHttpRequest {
        let xhr = XmlHttpRequest::with_prototype(prototype.clone());
        xhr.open("GET", "https://api.example.com/me").unwrap();
        xhr
    }

    #[test]
    fn test_surface_installed_and_removed() {
        let (launcher, _, _) = setup(LauncherConfig::new("scout"));
        assert!(launcher.namespace().contains("utils"));

        launcher.remove_module("utils").unwrap();
        assert!(launcher.namespace().get::<Utils>(UTILS_KEY).is_none());
    }

    #[test]
    fn test_authorization_header_logged_once() {
        let (launcher, logger, prototype) = setup(LauncherConfig::new("scout"));
        let watch = utils(&launcher).intercept_authorization_header();

        let xhr = opened(&prototype);
        xhr.set_request_header("Accept", "application/json").unwrap();
        xhr.set_request_header("Authorization", "Bearer t0k3n").unwrap();
        xhr.set_request_header("Authorization", "Bearer other").unwrap();

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Here is your auth code:");
        assert_eq!(entries[0].payload, Some(Value::from("Bearer t0k3n")));
        assert!(!watch.is_installed());
        assert_eq!(
            xhr.request_header("Authorization").as_deref(),
            Some("Bearer t0k3n, Bearer other")
        );
    }

    #[test]
    fn test_configured_auth_header() {
        let (launcher, logger, prototype) =
            setup(LauncherConfig::new("scout").auth_header("X-Auth-Token"));
        utils(&launcher).intercept_authorization_header();

        let xhr = opened(&prototype);
        xhr.set_request_header("Authorization", "ignored").unwrap();
        xhr.set_request_header("X-Auth-Token", "abc").unwrap();

        assert_eq!(logger.messages(), vec!["Here is your auth code:"]);
    }

    #[test]
    fn test_intercept_header_message() {
        let (launcher, logger, prototype) = setup(LauncherConfig::new("scout"));
        utils(&launcher).intercept_header("X-Api-Key");

        opened(&prototype).set_request_header("X-Api-Key", "abc123").unwrap();

        assert_eq!(logger.messages(), vec!["Intercepted X-Api-Key header:"]);
        assert_eq!(logger.entries()[0].payload, Some(Value::from("abc123")));
    }

    #[test]
    fn test_patches_outlive_deactivation() {
        let (launcher, logger, prototype) = setup(LauncherConfig::new("scout"));
        let target = HostObject::new("api");
        target.define_method("sum", |_, args| {
            let total: f64 = args.iter().filter_map(JsValue::as_number).sum();
            Ok(Outcome::ready(total))
        });

        let seen = Arc::new(Mutex::new(Vec::new()));
        let utils = utils(&launcher);
        let sink = seen.clone();
        utils.patch_function(target.methods(), "sum", move |result, _| {
            sink.lock().push(result.clone());
            Ok(())
        });
        utils.intercept_header("X-Api-Key");

        launcher.remove_module("utils").unwrap();
        drop(utils);

        assert_eq!(
            target.call_sync("sum", &[JsValue::from(2), JsValue::from(3)]).unwrap(),
            JsValue::Number(5.0)
        );
        assert_eq!(*seen.lock(), vec![JsValue::Number(5.0)]);

        opened(&prototype).set_request_header("X-Api-Key", "still-watched").unwrap();
        assert!(logger.contains("Intercepted X-Api-Key header:"));
    }

    #[test]
    fn test_decode_jwt_logs_payload() {
        let (launcher, logger, _) = setup(LauncherConfig::new("scout"));
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(r#"{"sub":"42"}"#));

        let payload = utils(&launcher).decode_jwt(&token).unwrap();
        assert_eq!(payload["sub"], "42");
        assert_eq!(logger.messages(), vec!["Decoded JWT:"]);
        assert_eq!(logger.entries()[0].payload, Some(payload));

        assert!(utils(&launcher).decode_jwt("garbage").is_err());
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_location_helpers() {
        let config = LauncherConfig::new("scout")
            .document_url("https://app.example.com/cb?code=xyz&state=1");
        let (launcher, _, _) = setup(config);
        let utils = utils(&launcher);

        assert_eq!(utils.query_variable("code").as_deref(), Some("xyz"));
        assert_eq!(utils.query_variable("nope"), None);
        assert_eq!(
            utils.query_variable_from_url("https://x.test/?a=1&b=2", "b").as_deref(),
            Some("2")
        );
        assert_eq!(utils.query_params("https://x.test/?a=1").len(), 1);

        utils.cookies().set_cookie("seen", "1", None);
        assert_eq!(utils.cookies().get_cookie("seen").as_deref(), Some("1"));
    }

    #[test]
    fn test_storage_uses_launcher_logger_and_quota() {
        let (launcher, logger, _) = setup(LauncherConfig::new("scout").storage_quota(32));
        let utils = utils(&launcher);

        utils.local_storage().set_item("k", &"v");
        utils.session_storage().set_item("big", &"x".repeat(64));

        assert_eq!(utils.local_storage().get_item::<String>("k").as_deref(), Some("v"));
        assert!(utils.session_storage().is_empty());
        assert!(logger.contains("localStorage: Set k = \"v\""));
        assert!(logger.contains("sessionStorage: Error setting big"));
    }

    #[test]
    fn test_nonce_from_csp() {
        let (launcher, _, _) = setup(LauncherConfig::new("scout"));
        let html = concat!(
            r#"<meta http-equiv="Content-Security-Policy" "#,
            r#"content="script-src 'nonce-abc='">"#
        );
        assert_eq!(utils(&launcher).nonce_from_csp(html).as_deref(), Some("abc="));
    }
}

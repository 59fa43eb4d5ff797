//! Bot-detection evasion applied to every new page
//!
//! Scripts are registered with `Page.addScriptToEvaluateOnNewDocument`, so
//! they run before any site script on every navigation of the page rather
//! than only on the document that happened to be loaded at injection time.

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use tracing::{debug, info, warn};

use crate::utils::CHROME_USER_AGENT;

/// Fingerprint the evasion scripts present to the site.
#[derive(Debug, Clone)]
pub struct StealthProfile {
    pub user_agent: String,
    pub accept_language: String,
    pub platform: String,
    pub languages: Vec<String>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub hardware_concurrency: u32,
}

impl Default for StealthProfile {
    fn default() -> Self {
        Self {
            user_agent: CHROME_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            platform: "Win32".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            screen_width: 1920,
            screen_height: 1080,
            webgl_vendor: "Intel Inc.".to_string(),
            webgl_renderer: "Intel(R) UHD Graphics".to_string(),
            hardware_concurrency: 8,
        }
    }
}

impl StealthProfile {
    /// User agent with any "Headless" marker removed.
    #[must_use]
    pub fn sanitized_user_agent(&self) -> String {
        self.user_agent.replace("HeadlessChrome", "Chrome")
    }

    /// Evasion scripts in injection order.
    #[must_use]
    pub fn scripts(&self) -> Vec<(&'static str, String)> {
        let languages =
            serde_json::to_string(&self.languages).unwrap_or_else(|_| "[]".to_string());

        vec![
            (
                "navigator.webdriver",
                r"Object.defineProperty(Navigator.prototype, 'webdriver', { get: () => undefined });"
                    .to_string(),
            ),
            (
                "navigator.languages",
                format!(
                    "Object.defineProperty(Navigator.prototype, 'languages', {{ get: () => {languages} }});"
                ),
            ),
            (
                "navigator.platform",
                format!(
                    "Object.defineProperty(Navigator.prototype, 'platform', {{ get: () => {} }});",
                    serde_json::to_string(&self.platform).unwrap_or_else(|_| "'Win32'".to_string())
                ),
            ),
            (
                "navigator.hardwareConcurrency",
                format!(
                    "Object.defineProperty(Navigator.prototype, 'hardwareConcurrency', {{ get: () => {} }});",
                    self.hardware_concurrency
                ),
            ),
            ("navigator.plugins", PLUGINS_JS.to_string()),
            ("chrome.runtime", CHROME_RUNTIME_JS.to_string()),
            (
                "webgl.vendor",
                WEBGL_JS
                    .replace("__VENDOR__", &js_literal(&self.webgl_vendor))
                    .replace("__RENDERER__", &js_literal(&self.webgl_renderer)),
            ),
        ]
    }
}

const PLUGINS_JS: &str = r"
(() => {
    const mockPlugins = [
        { name: 'Chrome PDF Plugin', description: 'Portable Document Format', filename: 'internal-pdf-viewer' },
        { name: 'Chrome PDF Viewer', description: '', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai' },
        { name: 'Native Client', description: '', filename: 'internal-nacl-plugin' }
    ];
    const proto = Object.getPrototypeOf(navigator.plugins);
    Object.defineProperty(Navigator.prototype, 'plugins', {
        get: () => {
            const plugins = {};
            mockPlugins.forEach((plugin, i) => {
                plugins[i] = plugin;
                plugins[plugin.name] = plugin;
            });
            Object.setPrototypeOf(plugins, proto);
            Object.defineProperty(plugins, 'length', { value: mockPlugins.length });
            return plugins;
        }
    });
})();
";

const CHROME_RUNTIME_JS: &str = r"
if (!window.chrome) {
    window.chrome = {};
}
if (!window.chrome.runtime) {
    window.chrome.runtime = {
        connect: () => ({
            onMessage: { addListener: () => {}, removeListener: () => {} },
            postMessage: () => {}
        })
    };
}
";

const WEBGL_JS: &str = r"
(() => {
    const handler = {
        apply: function(target, ctx, args) {
            const param = (args && args[0]) || null;
            if (param === 37445) return __VENDOR__;
            if (param === 37446) return __RENDERER__;
            return Reflect.apply(target, ctx, args);
        }
    };
    for (const ctx of [window.WebGLRenderingContext, window.WebGL2RenderingContext]) {
        if (ctx) {
            ctx.prototype.getParameter = new Proxy(ctx.prototype.getParameter, handler);
        }
    }
})();
";

fn js_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

/// Register evasion scripts, override the user agent and pin a desktop viewport.
///
/// Individual script failures are logged; the call only fails when no script
/// could be registered at all.
pub async fn enhance_page(page: &Page, profile: &StealthProfile) -> Result<()> {
    let scripts = profile.scripts();
    let total = scripts.len();
    let mut injected = 0;

    for (name, source) in scripts {
        let result = page
            .execute(AddScriptToEvaluateOnNewDocumentParams {
                source,
                include_command_line_api: None,
                world_name: None,
                run_immediately: None,
            })
            .await;
        match result {
            Ok(_) => {
                debug!("Injected evasion: {name}");
                injected += 1;
            }
            Err(e) => warn!("Failed to inject evasion {name}: {e}"),
        }
    }

    if injected == 0 {
        return Err(anyhow::anyhow!("Failed to inject any of {total} stealth scripts"));
    }

    let user_agent = SetUserAgentOverrideParams::builder()
        .user_agent(profile.sanitized_user_agent())
        .accept_language(profile.accept_language.clone())
        .platform(profile.platform.clone())
        .build()
        .map_err(anyhow::Error::msg)?;
    if let Err(e) = page.execute(user_agent).await {
        warn!("Failed to override user agent: {e}");
    }

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(profile.screen_width))
            .height(i64::from(profile.screen_height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    info!("Applied {injected}/{total} stealth evasions");
    Ok(())
}

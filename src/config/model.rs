use indexmap::IndexMap;

/// Full per-app configuration document (`{app}_config.json`).
///
/// Loaded once per generation run and never mutated afterwards. Device and
/// language maps keep the order in which they were declared in the file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    /// Display/app name; also the per-app output directory name.
    pub app_name: String,
    /// Language used when a requested language has no entry.
    #[serde(default = "default_base_language")]
    pub base_language: String,
    /// Output root, relative to the project root.
    #[serde(default = "default_output_base_dir")]
    pub output_base_dir: String,
    /// App-wide marketing URL (languages may override).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_url: Option<String>,
    /// App-wide support URL (languages may override).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    /// App-wide privacy URL (languages may override).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<String>,
    /// Device form factors keyed by device id (e.g. `iphone`, `ipad`).
    #[serde(default)]
    pub devices: IndexMap<String, DeviceSettings>,
    /// Localization entries keyed by language code.
    #[serde(default)]
    pub localization: IndexMap<String, LocalizationEntry>,
}

/// Geometry, assets and typography for one device type.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceSettings {
    /// Vertical offset added to the bottom-anchored phone position.
    #[serde(default = "default_phone_y_offset")]
    pub phone_y_offset: i32,
    /// Vertical offset from the phone top to the text block center.
    #[serde(default = "default_text_y_offset")]
    pub text_y_offset: i32,
    /// Background image filename under the app's resources directory.
    #[serde(default = "default_background_image")]
    pub background_image: String,
    /// Opaque token embedded in output filenames.
    #[serde(default)]
    pub fastlane_device_identifier: String,
    /// Fraction applied to the phone screenshot dimensions.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Title font size in pixels.
    #[serde(default = "default_font_size_title")]
    pub font_size_title: u32,
    /// Body font size in pixels.
    #[serde(default = "default_font_size_body")]
    pub font_size_body: u32,
    /// Single-file fallback font, relative to the fonts root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_font_path: Option<String>,
    /// Ordered screenshot slots.
    #[serde(default)]
    pub screenshots: Vec<ScreenshotRef>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            phone_y_offset: default_phone_y_offset(),
            text_y_offset: default_text_y_offset(),
            background_image: default_background_image(),
            fastlane_device_identifier: String::new(),
            scale_factor: default_scale_factor(),
            font_size_title: default_font_size_title(),
            font_size_body: default_font_size_body(),
            fallback_font_path: None,
            screenshots: Vec::new(),
        }
    }
}

/// One screenshot slot of a device.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScreenshotRef {
    /// Phone screenshot filename under the app's resources directory.
    pub filename: String,
}

/// Per-language texts, typography and store metadata.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocalizationEntry {
    /// Overlay texts, index-aligned with a device's screenshots.
    #[serde(default)]
    pub screenshot_texts: Vec<String>,
    /// Font selection for this language.
    #[serde(default)]
    pub font_mapping: FontMapping,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub release_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_url: Option<String>,
}

/// Font files and resolution flags for one language.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontMapping {
    /// Regular weight filename (body font).
    #[serde(default = "default_regular_font")]
    pub regular: String,
    /// Bold weight filename (title font).
    #[serde(default = "default_bold_font")]
    pub bold: String,
    /// Family subdirectory under the fonts root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<String>,
    /// Variable font filename; takes priority over `regular`/`bold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_font: Option<String>,
    /// Skip designed fonts and go straight to system fonts.
    #[serde(default)]
    pub use_system_font: bool,
    /// On variable-font failure, jump to system fonts.
    #[serde(default)]
    pub use_system_font_fallback: bool,
    /// Single-file fallback font, relative to the fonts root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_font_path: Option<String>,
}

impl Default for FontMapping {
    fn default() -> Self {
        Self {
            regular: default_regular_font(),
            bold: default_bold_font(),
            font_path: Some("NotoSans".to_string()),
            variable_font: None,
            use_system_font: false,
            use_system_font_fallback: false,
            fallback_font_path: None,
        }
    }
}

/// Derived, immutable description of one screenshot slot for one
/// (device, language) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceConfig {
    /// Phone screenshot filename.
    pub filename: String,
    /// Overlay text; empty when the language has fewer texts than slots.
    pub text: String,
    pub phone_y_offset: i32,
    pub text_y_offset: i32,
    pub background_image: String,
    pub fastlane_device_identifier: String,
    pub scale_factor: f64,
    pub font_size_title: u32,
    pub font_size_body: u32,
    pub fallback_font_path: Option<String>,
}

impl DeviceConfig {
    /// Zip a device's screenshot sequence with a language's text sequence.
    ///
    /// Alignment is positional; missing texts become empty strings.
    pub fn build_all(device: &DeviceSettings, entry: &LocalizationEntry) -> Vec<DeviceConfig> {
        device
            .screenshots
            .iter()
            .enumerate()
            .map(|(i, shot)| DeviceConfig {
                filename: shot.filename.clone(),
                text: entry.screenshot_texts.get(i).cloned().unwrap_or_default(),
                phone_y_offset: device.phone_y_offset,
                text_y_offset: device.text_y_offset,
                background_image: device.background_image.clone(),
                fastlane_device_identifier: device.fastlane_device_identifier.clone(),
                scale_factor: device.scale_factor,
                font_size_title: device.font_size_title,
                font_size_body: device.font_size_body,
                fallback_font_path: device.fallback_font_path.clone(),
            })
            .collect()
    }
}

fn default_base_language() -> String {
    "ko".to_string()
}

fn default_output_base_dir() -> String {
    "output".to_string()
}

fn default_phone_y_offset() -> i32 {
    180
}

fn default_text_y_offset() -> i32 {
    -120
}

fn default_background_image() -> String {
    "iphone_background.jpg".to_string()
}

fn default_scale_factor() -> f64 {
    0.8
}

fn default_font_size_title() -> u32 {
    100
}

fn default_font_size_body() -> u32 {
    32
}

fn default_regular_font() -> String {
    "NotoSans-Regular.ttf".to_string()
}

fn default_bold_font() -> String {
    "NotoSans-Bold.ttf".to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;

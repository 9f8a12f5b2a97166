use crate::error::SiteConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_NAME: &str = "Hackerspace";
pub const SITE_NAME_MAX_LEN: usize = 50;

/// The single configuration row owned by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfigRecord {
    pub id: i64,
    pub tenant_id: String,
    pub site_name: String,
    pub banner_image: Option<String>,
    pub banner_image_dark: Option<String>,
    pub site_logo: Option<String>,
    pub default_icon: Option<String>,
    pub favicon: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update submitted through the administrative surface.
///
/// Absent fields are left unchanged. An empty image reference clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfigChanges {
    pub site_name: Option<String>,
    pub banner_image: Option<String>,
    pub banner_image_dark: Option<String>,
    pub site_logo: Option<String>,
    pub default_icon: Option<String>,
    pub favicon: Option<String>,
}

impl SiteConfigChanges {
    pub fn site_name(name: impl Into<String>) -> Self {
        Self {
            site_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Apply onto `record`, validating first so a rejected change leaves it untouched.
    pub fn apply_to(&self, record: &mut SiteConfigRecord) -> Result<(), SiteConfigError> {
        let site_name = match self.site_name.as_deref().map(str::trim) {
            Some("") => {
                return Err(SiteConfigError::Validation(
                    "site_name must not be empty".to_string(),
                ));
            }
            Some(name) if name.chars().count() > SITE_NAME_MAX_LEN => {
                return Err(SiteConfigError::Validation(format!(
                    "site_name must be at most {SITE_NAME_MAX_LEN} characters"
                )));
            }
            other => other,
        };

        if let Some(name) = site_name {
            record.site_name = name.to_string();
        }
        apply_image(&mut record.banner_image, &self.banner_image);
        apply_image(&mut record.banner_image_dark, &self.banner_image_dark);
        apply_image(&mut record.site_logo, &self.site_logo);
        apply_image(&mut record.default_icon, &self.default_icon);
        apply_image(&mut record.favicon, &self.favicon);
        Ok(())
    }
}

fn apply_image(slot: &mut Option<String>, change: &Option<String>) {
    match change.as_deref().map(str::trim) {
        None => {}
        Some("") => *slot = None,
        Some(reference) => *slot = Some(reference.to_string()),
    }
}

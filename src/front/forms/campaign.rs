use crate::{api, models::campaign::TemplateReference};

/// Send form of the dashboard, multiline fields hold one value per line
#[derive(serde::Deserialize, Debug)]
pub struct CampaignForm {
    #[serde(default)]
    pub to_numbers: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_variables: String,
}

impl CampaignForm {
    pub fn recipients(&self) -> Vec<String> {
        api::campaign::split_lines(&self.to_numbers)
    }

    pub fn template(&self, language_code: &str) -> TemplateReference {
        TemplateReference::new(
            &self.template_name,
            language_code,
            api::campaign::split_lines(&self.template_variables),
        )
    }
}

/// Body of `POST /api/send-whatsapp`
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SendCampaignRequest {
    pub to_numbers: Vec<String>,
    pub template_name: String,
    pub template_variables: Vec<String>,
    pub language_code: Option<String>,
}

impl SendCampaignRequest {
    pub fn recipients(&self) -> Vec<String> {
        self.to_numbers
            .iter()
            .map(|to| to.trim())
            .filter(|to| !to.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The request language wins over `default_language_code`
    pub fn template(&self, default_language_code: &str) -> TemplateReference {
        let language_code = self
            .language_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(default_language_code);

        TemplateReference::new(
            &self.template_name,
            language_code,
            self.template_variables.clone(),
        )
    }
}

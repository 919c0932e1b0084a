//! Element locators and the Booker UI locators used by the export flows

use serde::{Deserialize, Serialize};
use std::fmt;

/// How to find an element on the current page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// `id` attribute
    Id(String),
    /// XPath expression
    XPath(String),
    /// CSS selector
    Css(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::Css(value.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={v}"),
            Locator::XPath(v) => write!(f, "xpath={v}"),
            Locator::Css(v) => write!(f, "css={v}"),
        }
    }
}

/// Element ids and XPaths of the Booker admin pages
pub mod booker {
    use super::Locator;
    use crate::domain::{LocationId, ViewId};

    pub const VIEW_SELECT_ID: &str = "ctl00_ctl00_content_content_ddlViewing";
    pub const DATE_TYPE_SELECT_ID: &str = "ctl00_ctl00_content_content_ddlDateType";
    pub const EXPORT_BUTTON_ID: &str = "ctl00_ctl00_content_content_btnExport";
    pub const APPOINTMENTS_DATE_INPUT_ID: &str = "ctl00_ctl00_content_content_txtDate";
    pub const ORDERS_DATE_INPUT_ID: &str = "ctl00_ctl00_content_content_txtDateCreated";

    /// Date-type option that filters appointments by booking date
    pub const APPOINTMENT_CREATED_ON: &str = "ApptCreatedOn";

    pub fn account_name_input() -> Locator {
        Locator::id("AccountName")
    }

    pub fn username_input() -> Locator {
        Locator::id("Username")
    }

    pub fn password_input() -> Locator {
        Locator::id("Password")
    }

    pub fn submit_button() -> Locator {
        Locator::xpath("//button[@type='submit']")
    }

    pub fn impersonate_link(location: &LocationId) -> Locator {
        Locator::xpath(format!("//a[@href='Impersonate.aspx?SpaID={location}']"))
    }

    pub fn view_select() -> Locator {
        Locator::id(VIEW_SELECT_ID)
    }

    pub fn date_type_select() -> Locator {
        Locator::id(DATE_TYPE_SELECT_ID)
    }

    pub fn option(value: &str) -> Locator {
        Locator::xpath(format!(r#"//option[@value="{value}"]"#))
    }

    pub fn selected_option(value: &str) -> Locator {
        Locator::xpath(format!(
            r#"//option[@value="{value}" and @selected="selected"]"#
        ))
    }

    pub fn view_option(view: ViewId) -> Locator {
        option(&view.to_string())
    }

    pub fn export_button() -> Locator {
        Locator::id(EXPORT_BUTTON_ID)
    }

    pub fn ok_button() -> Locator {
        Locator::xpath(r#"//input[@value="Ok" and @class="xSubmitPrimary"]"#)
    }

    pub fn processing_overlay() -> Locator {
        Locator::xpath(r#"//div[@class="reports-overlay-words"]"#)
    }

    pub fn appointments_date_input() -> Locator {
        Locator::id(APPOINTMENTS_DATE_INPUT_ID)
    }

    pub fn orders_date_input() -> Locator {
        Locator::id(ORDERS_DATE_INPUT_ID)
    }

    /// Export history entry labelled with its trigger time
    pub fn export_label(label: &str) -> Locator {
        Locator::xpath(format!("//a[string()='{label}']"))
    }

    /// Export history entry once its file is ready to download
    pub fn export_download_link(label: &str) -> Locator {
        Locator::xpath(format!(
            "//a[string()='{label}' and @title='download .csv file']"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationId, ViewId};

    #[test]
    fn test_impersonate_link() {
        let id = LocationId::new("36085").unwrap();
        assert_eq!(
            booker::impersonate_link(&id),
            Locator::XPath("//a[@href='Impersonate.aspx?SpaID=36085']".to_string())
        );
    }

    #[test]
    fn test_view_option_locators() {
        assert_eq!(
            booker::view_option(ViewId::new(57514)),
            Locator::XPath(r#"//option[@value="57514"]"#.to_string())
        );
        assert_eq!(
            booker::selected_option("ApptCreatedOn"),
            Locator::XPath(
                r#"//option[@value="ApptCreatedOn" and @selected="selected"]"#.to_string()
            )
        );
    }

    #[test]
    fn test_export_link_locators() {
        let label = "Jan 5, 2024  3:45 pm";
        assert_eq!(
            booker::export_label(label).to_string(),
            "xpath=//a[string()='Jan 5, 2024  3:45 pm']"
        );
        assert_eq!(
            booker::export_download_link(label).to_string(),
            "xpath=//a[string()='Jan 5, 2024  3:45 pm' and @title='download .csv file']"
        );
    }
}

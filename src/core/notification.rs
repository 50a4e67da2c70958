use crate::domain::model::ChangeReport;
use std::fmt::Write;

/// 一封通知信的主旨與純文字內容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn unreachable(url: &str, status_code: u16) -> Self {
        Self {
            subject: format!("Website {} is invalid or removed", url),
            body: format!(
                "The website {} returned an HTTP status code {}. \
                 Please check if the website is still valid or has been removed.",
                url, status_code
            ),
        }
    }

    pub fn changed(url: &str, report: &ChangeReport, include_keywords: bool) -> Self {
        let mut body = format!("The website {} has been updated.\n", url);

        for span in &report.spans {
            // writing into a String cannot fail
            let _ = write!(
                body,
                "\nOld text:\n{}\n\nNew text:\n{}\n",
                span.old, span.new
            );
        }

        if include_keywords && !report.new_keywords.is_empty() {
            body.push_str("\nKeyword counts (old -> new):\n");
            for (category, new_count) in report.new_keywords.iter() {
                let old_count = report.old_keywords.get(category).unwrap_or(0);
                let _ = writeln!(body, "{}: {} -> {}", category, old_count, new_count);
            }
        }

        Self {
            subject: format!("Website update: {}", url),
            body,
        }
    }
}

//! Reminder email composition.

use serde::{Deserialize, Serialize};

use super::ReminderNotice;

/// Sender identity and links used when composing reminder emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    /// `From` header value.
    pub from: String,
    /// Base URL of the web app; the schedule link is `<base>/vaccines`.
    pub app_base_url: String,
}

/// A fully rendered email ready for a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Sender.
    pub from: String,
    /// Recipient.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

impl EmailTemplate {
    /// Link to the vaccine schedule page.
    #[must_use]
    pub fn schedule_url(&self) -> String {
        format!("{}/vaccines", self.app_base_url.trim_end_matches('/'))
    }

    /// Renders the reminder email for `notice`.
    #[must_use]
    pub fn compose(&self, notice: &ReminderNotice) -> EmailMessage {
        let due = notice.due_date.format("%A, %B %-d, %Y").to_string();
        let link = self.schedule_url();
        let baby = &notice.display_name;
        let vaccine = &notice.vaccine_name;

        let text = format!(
            "Vaccine Reminder for {baby}\n\n\
             Vaccine: {vaccine}\n\
             Due Date: {due}\n\n\
             Please schedule an appointment with your pediatrician to ensure {baby} \
             receives this important vaccination on time.\n\n\
             Visit {link} to view your complete vaccine schedule.\n\n\
             - BabyTrack Team\n"
        );

        let (baby_html, vaccine_html, link_html) =
            (escape_html(baby), escape_html(vaccine), escape_html(&link));
        let html = format!(
            "<!DOCTYPE html>\n<html><body>\
             <h1>Vaccine Reminder</h1>\
             <p>This is a friendly reminder that <strong>{baby_html}</strong> has an upcoming vaccine due soon.</p>\
             <p><strong>Vaccine:</strong> {vaccine_html}<br>\
             <strong>Due Date:</strong> {due}<br>\
             <strong>Baby:</strong> {baby_html}</p>\
             <p>Please schedule an appointment with your pediatrician to ensure {baby_html} \
             receives this important vaccination on time.</p>\
             <p><a href=\"{link_html}\">View Vaccine Schedule</a></p>\
             <p style=\"color:#666;font-size:12px\">This is an automated reminder from BabyTrack</p>\
             </body></html>\n"
        );

        EmailMessage {
            from: self.from.clone(),
            to: notice.address.clone(),
            subject: format!("Vaccine Reminder: {vaccine} for {baby}"),
            text,
            html,
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

//! Email bodies for alert notifications.
//!
//! Every user-supplied string is HTML-escaped before it is placed in the
//! HTML alternative.

use safestep_core::alert::Location;
use safestep_core::types::{DbId, Timestamp};

use crate::delivery::email::OutgoingEmail;

/// Build the emergency email sent to one trusted contact.
pub fn emergency_notification(
    contact_email: &str,
    contact_name: &str,
    sender_name: &str,
    location: &Location,
    alert_id: DbId,
) -> OutgoingEmail {
    let maps_url = location.maps_url();
    let address = location.display_address();

    let subject = format!("EMERGENCY ALERT: {sender_name} needs help!");

    let text = format!(
        "Hello {contact_name},\n\n\
         {sender_name} has sent an emergency alert and may need immediate assistance.\n\n\
         Address: {address}\n\
         Coordinates: {lat}, {lon}\n\
         Map: {maps_url}\n\n\
         What you should do:\n\
         - Contact {sender_name} immediately if possible\n\
         - Call emergency services if needed\n\
         - Go to the location if it is safe to do so\n\
         - Contact other emergency contacts if available\n\n\
         Alert ID: {alert_id}\n\
         Sent via SafeStep.",
        lat = location.latitude,
        lon = location.longitude,
    );

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1 style=\"color: #dc3545;\">EMERGENCY ALERT</h1>\
         <p>Hello {contact},</p>\
         <h2>{sender} has sent an emergency alert!</h2>\
         <p><strong>This person may be in danger and needs immediate assistance.</strong></p>\
         <h3>Current location</h3>\
         <p><strong>Address:</strong> {address}</p>\
         <p><strong>Coordinates:</strong> {lat}, {lon}</p>\
         <p><a href=\"{maps_url}\">View on Google Maps</a></p>\
         <h4>What you should do:</h4>\
         <ul>\
         <li>Contact {sender} immediately if possible</li>\
         <li>Call emergency services if needed</li>\
         <li>Go to the location if it is safe to do so</li>\
         <li>Contact other emergency contacts if available</li>\
         </ul>\
         <p style=\"color: #6c757d; font-size: 12px;\">Sent via SafeStep. Alert ID: {alert_id}</p>\
         </div>",
        contact = escape_html(contact_name),
        sender = escape_html(sender_name),
        address = escape_html(address),
        lat = location.latitude,
        lon = location.longitude,
        maps_url = escape_html(&maps_url),
    );

    OutgoingEmail {
        to: contact_email.to_string(),
        subject,
        text,
        html,
    }
}

/// Build the confirmation email sent back to the user who raised the alert.
pub fn alert_confirmation(
    owner_email: &str,
    owner_name: &str,
    location: &Location,
    alert_id: DbId,
    contact_count: usize,
    sent_at: Timestamp,
) -> OutgoingEmail {
    let maps_url = location.maps_url();
    let address = location.display_address();
    let contacts = if contact_count == 1 {
        "1 contact".to_string()
    } else {
        format!("{contact_count} contacts")
    };
    let sent_at = sent_at.format("%Y-%m-%d %H:%M:%S UTC");

    let subject = "Emergency Alert Confirmation - SafeStep".to_string();

    let text = format!(
        "Hello {owner_name},\n\n\
         Your emergency alert is being sent to {contacts}.\n\n\
         Time sent: {sent_at}\n\
         Location: {address}\n\
         Coordinates: {lat}, {lon}\n\
         Map: {maps_url}\n\n\
         If you are safe now, please let your contacts know and mark this \
         alert as resolved in your SafeStep dashboard.\n\n\
         Alert ID: {alert_id}",
        lat = location.latitude,
        lon = location.longitude,
    );

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1 style=\"color: #28a745;\">Emergency Alert Sent</h1>\
         <h2>Hello {owner},</h2>\
         <p><strong>Your emergency alert is being sent to {contacts}.</strong></p>\
         <h3>Alert details</h3>\
         <p><strong>Time sent:</strong> {sent_at}</p>\
         <p><strong>Location:</strong> {address}</p>\
         <p><strong>Coordinates:</strong> {lat}, {lon}</p>\
         <p><a href=\"{maps_url}\">View location on Google Maps</a></p>\
         <p>If you are safe now, please let your contacts know and mark this alert \
         as resolved in your SafeStep dashboard.</p>\
         <p style=\"color: #6c757d; font-size: 12px;\">Alert ID: {alert_id}</p>\
         </div>",
        owner = escape_html(owner_name),
        address = escape_html(address),
        lat = location.latitude,
        lon = location.longitude,
        maps_url = escape_html(&maps_url),
    );

    OutgoingEmail {
        to: owner_email.to_string(),
        subject,
        text,
        html,
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
            _ => out.push(c),
        }
    }
    out
}

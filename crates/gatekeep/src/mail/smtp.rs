use handlebars::Handlebars;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, client::Tls},
    Message, SmtpTransport, Transport,
};
use serde_json::Value;

use crate::{
    config::{SMTPSettings, Template, Templates},
    Error, Result, Success,
};

use super::MailDispatcher;

lazy_static! {
    static ref HANDLEBARS: Handlebars<'static> = Handlebars::new();
}

/// Delivers templated email through an SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    from: Mailbox,
    reply_to: Option<Mailbox>,
    templates: Templates,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(smtp: &SMTPSettings, templates: Templates) -> Result<SmtpMailer> {
        let relay = if let Some(false) = smtp.use_tls {
            SmtpTransport::builder_dangerous(&smtp.host).tls(Tls::None)
        } else {
            SmtpTransport::relay(&smtp.host).map_err(|_| Error::IncorrectData {
                with: "smtp.host",
            })?
        };

        let relay = if let Some(port) = smtp.port {
            relay.port(port)
        } else {
            relay
        };

        let transport = relay
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        Ok(SmtpMailer {
            from: smtp.from.parse().map_err(|_| Error::IncorrectData {
                with: "smtp.from",
            })?,
            reply_to: match &smtp.reply_to {
                Some(reply_to) => Some(reply_to.parse().map_err(|_| Error::IncorrectData {
                    with: "smtp.reply_to",
                })?),
                None => None,
            },
            templates,
            transport,
        })
    }

    /// Build the message for a template without sending it
    pub fn render(&self, to: &str, subject: &str, template: &str, context: &Value) -> Result<Message> {
        let template = self.templates.get(template).ok_or(Error::RenderFail)?;
        let (text, html) = render_template(template, context)?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().map_err(|_| Error::EmailFailed)?)
            .subject(subject);

        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.clone());
        }

        let message = if let Some(html) = html {
            builder.multipart(MultiPart::alternative_plain_html(text, html))
        } else {
            builder.singlepart(SinglePart::plain(text))
        };

        message.map_err(|_| Error::EmailFailed)
    }
}

fn render_template(template: &Template, context: &Value) -> Result<(String, Option<String>)> {
    let text = HANDLEBARS
        .render_template(&template.text, context)
        .map_err(|_| Error::RenderFail)?;

    let html = match &template.html {
        Some(html) => Some(
            HANDLEBARS
                .render_template(html, context)
                .map_err(|_| Error::RenderFail)?,
        ),
        None => None,
    };

    Ok((text, html))
}

#[async_trait]
impl MailDispatcher for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, template: &str, context: Value) -> Success {
        let message = self.render(to, subject, template, &context)?;
        let transport = self.transport.clone();

        async_std::task::spawn_blocking(move || transport.send(&message))
            .await
            .map(|_| ())
            .map_err(|err| {
                error!("Failed to deliver email: {:?}", err);
                Error::EmailFailed
            })
    }
}

/*
[INPUT]:  Notification channels (email, phone, Telegram) and settings
[OUTPUT]: Subscription state and mutation results
[POS]:    HTTP layer - notification subscription endpoints (require a session)
[UPDATE]: When subscription endpoints or payloads change
*/

// ### Subscription Endpoints

use reqwest::Method;

use crate::http::{MonitorApi, Result};
use crate::types::{
    AddEmailRequest, AddPhoneRequest, AddTelegramRequest, BalanceResponse, EmailsEnvelope,
    PhonesEnvelope, RemoveEmailRequest, RemovePhoneRequest, RemoveTelegramRequest,
    SubscriptionEmail, SubscriptionInfo, SubscriptionInfoEnvelope, SubscriptionPhone,
    SubscriptionResponse, SubscriptionSettingsRequest, TelegramChat, TelegramChatsEnvelope,
    TelegramConnectLinkResponse, TelegramConnectionStatusResponse, TelegramEnabledRequest,
};

impl MonitorApi {
    /// GET /user/subscription-info
    pub async fn subscription_info(&self) -> Result<SubscriptionInfo> {
        let builder = self.authed(Method::GET, "/user/subscription-info").await?;
        let envelope: SubscriptionInfoEnvelope = self.send_json(builder).await?;
        Ok(envelope.subscription_info)
    }

    /// PUT /user/subscription-settings
    pub async fn update_subscription_settings(
        &self,
        settings: &SubscriptionSettingsRequest,
    ) -> Result<SubscriptionResponse> {
        let builder = self
            .authed(Method::PUT, "/user/subscription-settings")
            .await?
            .json(settings);
        self.send_json(builder).await
    }

    // Email

    /// GET /user/subscription-emails
    pub async fn subscription_emails(&self) -> Result<Vec<SubscriptionEmail>> {
        let builder = self.authed(Method::GET, "/user/subscription-emails").await?;
        let envelope: EmailsEnvelope = self.send_json(builder).await?;
        Ok(envelope.emails)
    }

    /// POST /user/subscription-emails
    pub async fn add_subscription_email(
        &self,
        email: &str,
        is_primary: bool,
    ) -> Result<SubscriptionResponse> {
        let body = AddEmailRequest {
            email: email.to_string(),
            is_primary,
        };
        let builder = self
            .authed(Method::POST, "/user/subscription-emails")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    /// DELETE /user/subscription-emails
    pub async fn remove_subscription_email(&self, email: &str) -> Result<SubscriptionResponse> {
        let body = RemoveEmailRequest {
            email: email.to_string(),
        };
        let builder = self
            .authed(Method::DELETE, "/user/subscription-emails")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    /// Make `email` the primary address.
    ///
    /// The backend has no primary toggle, so the current primary is re-added
    /// as secondary and `email` is re-added as primary.
    pub async fn set_primary_email(&self, email: &str) -> Result<()> {
        let emails = self.subscription_emails().await?;
        if let Some(current) = emails.iter().find(|e| e.is_primary && e.email != email) {
            self.remove_subscription_email(&current.email).await?;
            self.add_subscription_email(&current.email, false).await?;
        }
        self.remove_subscription_email(email).await?;
        self.add_subscription_email(email, true).await?;
        Ok(())
    }

    // Phone

    /// GET /user/subscription-phones
    pub async fn subscription_phones(&self) -> Result<Vec<SubscriptionPhone>> {
        let builder = self.authed(Method::GET, "/user/subscription-phones").await?;
        let envelope: PhonesEnvelope = self.send_json(builder).await?;
        Ok(envelope.phones)
    }

    /// POST /user/subscription-phones
    pub async fn add_subscription_phone(
        &self,
        phone_number: &str,
        is_primary: bool,
    ) -> Result<SubscriptionResponse> {
        let body = AddPhoneRequest {
            phone_number: phone_number.to_string(),
            is_primary,
        };
        let builder = self
            .authed(Method::POST, "/user/subscription-phones")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    /// DELETE /user/subscription-phones
    pub async fn remove_subscription_phone(&self, phone_number: &str) -> Result<SubscriptionResponse> {
        let body = RemovePhoneRequest {
            phone_number: phone_number.to_string(),
        };
        let builder = self
            .authed(Method::DELETE, "/user/subscription-phones")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    pub async fn set_primary_phone(&self, phone_number: &str) -> Result<()> {
        let phones = self.subscription_phones().await?;
        if let Some(current) = phones
            .iter()
            .find(|p| p.is_primary && p.phone_number != phone_number)
        {
            self.remove_subscription_phone(&current.phone_number).await?;
            self.add_subscription_phone(&current.phone_number, false).await?;
        }
        self.remove_subscription_phone(phone_number).await?;
        self.add_subscription_phone(phone_number, true).await?;
        Ok(())
    }

    // Telegram

    /// GET /user/subscription-telegram
    pub async fn telegram_chats(&self) -> Result<Vec<TelegramChat>> {
        let builder = self.authed(Method::GET, "/user/subscription-telegram").await?;
        let envelope: TelegramChatsEnvelope = self.send_json(builder).await?;
        Ok(envelope.telegram_chats)
    }

    /// POST /user/subscription-telegram
    pub async fn add_telegram_chat(
        &self,
        telegram_chat_id: &str,
        is_primary: bool,
    ) -> Result<SubscriptionResponse> {
        let body = AddTelegramRequest {
            telegram_chat_id: telegram_chat_id.to_string(),
            is_primary,
        };
        let builder = self
            .authed(Method::POST, "/user/subscription-telegram")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    /// DELETE /user/subscription-telegram
    pub async fn remove_telegram_chat(&self, telegram_chat_id: &str) -> Result<SubscriptionResponse> {
        let body = RemoveTelegramRequest {
            telegram_chat_id: telegram_chat_id.to_string(),
        };
        let builder = self
            .authed(Method::DELETE, "/user/subscription-telegram")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    pub async fn set_primary_telegram(&self, telegram_chat_id: &str) -> Result<()> {
        let chats = self.telegram_chats().await?;
        if let Some(current) = chats
            .iter()
            .find(|c| c.is_primary && c.telegram_chat_id != telegram_chat_id)
        {
            self.remove_telegram_chat(&current.telegram_chat_id).await?;
            self.add_telegram_chat(&current.telegram_chat_id, false).await?;
        }
        self.remove_telegram_chat(telegram_chat_id).await?;
        self.add_telegram_chat(telegram_chat_id, true).await?;
        Ok(())
    }

    /// PUT /user/subscription-telegram-enabled
    pub async fn set_telegram_enabled(&self, enabled: bool) -> Result<SubscriptionResponse> {
        let body = TelegramEnabledRequest {
            telegram_enabled: enabled,
        };
        let builder = self
            .authed(Method::PUT, "/user/subscription-telegram-enabled")
            .await?
            .json(&body);
        self.send_json(builder).await
    }

    /// Send a test notification to the connected chats
    ///
    /// POST /user/test-telegram
    pub async fn test_telegram(&self) -> Result<SubscriptionResponse> {
        let builder = self.authed(Method::POST, "/user/test-telegram").await?;
        self.send_json(builder).await
    }

    /// POST /user/telegram-connect-link
    pub async fn telegram_connect_link(&self) -> Result<TelegramConnectLinkResponse> {
        let builder = self.authed(Method::POST, "/user/telegram-connect-link").await?;
        self.send_json(builder).await
    }

    /// GET /user/telegram-connection-status
    pub async fn telegram_connection_status(&self) -> Result<TelegramConnectionStatusResponse> {
        let builder = self
            .authed(Method::GET, "/user/telegram-connection-status")
            .await?;
        self.send_json(builder).await
    }

    /// Backend smoke endpoint
    ///
    /// GET /test/balance
    pub async fn test_balance(&self) -> Result<BalanceResponse> {
        let builder = self.authed(Method::GET, "/test/balance").await?;
        self.send_json(builder).await
    }
}

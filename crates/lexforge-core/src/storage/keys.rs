//! Key names shared by every reader and writer of the two stores.

/// Keys living in the session-scoped store.
pub mod session {
    /// Id of the draft saved before the sign-in redirect.
    pub const DRAFT_CONTRACT_ID: &str = "draftContractId";
    /// Action to resume after sign-in.
    pub const AUTH_REDIRECT_ACTION: &str = "authRedirectAction";
    /// Full payload of the in-flight contract, used when the draft cannot be fetched.
    pub const TEMP_CONTRACT_DATA: &str = "tempContractData";
    /// Assignee variant chosen in the first step.
    pub const BUSINESS_INFO: &str = "businessInfo";
    pub const TEMP_DASHBOARD_DATA: &str = "tempDashboardData";
    /// Assignee details entered by an anonymous user.
    pub const TEMP_BUSINESS_INFO: &str = "tempBusinessInfo";
    pub const ANONYMOUS_USER_ID: &str = "anonymousUserId";

    /// Keys dropped when an anonymous session ends.
    pub const TEMPORARY: [&str; 6] = [
        DRAFT_CONTRACT_ID,
        AUTH_REDIRECT_ACTION,
        TEMP_CONTRACT_DATA,
        BUSINESS_INFO,
        TEMP_DASHBOARD_DATA,
        TEMP_BUSINESS_INFO,
    ];
}

/// Keys living in the persistent store.
pub mod persistent {
    pub const LAST_DRAFT_CONTRACT_ID: &str = "lastDraftContractId";
    pub const LAST_AUTH_REDIRECT_ACTION: &str = "lastAuthRedirectAction";
    pub const ANONYMOUS_USER_ID: &str = "anonymousUserId";
    /// Provider id of the last signed-in user.
    pub const CLERK_USER_ID: &str = "clerkUserId";

    const SECURITY_ALERT_PREFIX: &str = "securityAlert_";

    /// Flag marking a draft whose migration failed the security check.
    pub fn security_alert(draft_id: &str) -> String {
        format!("{SECURITY_ALERT_PREFIX}{draft_id}")
    }

    /// Extracts the draft id from a security-alert key.
    pub fn security_alert_draft_id(key: &str) -> Option<&str> {
        key.strip_prefix(SECURITY_ALERT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_alert_key_round_trip() {
        let key = persistent::security_alert("abc123");
        assert_eq!(key, "securityAlert_abc123");
        assert_eq!(persistent::security_alert_draft_id(&key), Some("abc123"));
        assert_eq!(persistent::security_alert_draft_id("draftContractId"), None);
    }

    #[test]
    fn test_temporary_keys_exclude_anonymous_id() {
        assert!(!session::TEMPORARY.contains(&session::ANONYMOUS_USER_ID));
    }
}

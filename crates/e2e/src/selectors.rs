//! XPath locators for the eligibility page
//!
//! Placeholder text and button labels are the de facto contract under
//! test; changes here track changes on the page itself.

/// Mobile-number input, matched by placeholder
pub const MOBILE_INPUT: &str = "//*[contains(@placeholder, 'Enter mobile number')]";

/// PAN input, matched by placeholder
pub const PAN_INPUT: &str = "//*[contains(@placeholder, 'Enter PAN')]";

/// Submit control, matched by label
pub const SUBMIT: &str = "//*[contains(text(),'Check eligibility for FREE')]";

/// Consent note under the form
pub const CONSENT_NOTE: &str = "//*[contains(text(),'By proceeding, I accept')]";

/// Terms-and-conditions link
pub const TERMS_LINK: &str = "//*[contains(text(),'T&Cs')]";

/// Hint shown when the identity has no investments behind it
pub const RETRY_HINT: &str = "//*[contains(text(),'Try with another mobile or PAN')]";

/// Resend control offered during the OTP flow
pub const RESEND_OTP: &str = "//*[contains(text(),'Resend OTP')]";

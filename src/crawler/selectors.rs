//! CSS selectors for the job board's markup
//!
//! The site ships generated class names, so these break whenever it redeploys
//! its component library. Keep every selector here.

/// Search-results listing
pub mod listing {
    /// Present once the result cards have rendered
    pub const LANDMARK: &str = "div.JobCardsc__JobcardContainer-sc-hmqj50-0";

    /// One result card
    pub const CARD: &str = "div.JobCardsc__JobcardContainer-sc-hmqj50-0";

    /// Title anchor of a card; its href is the detail reference
    pub const TITLE: &str = "a.CompactOpportunityCardsc__JobCardTitleNoStyleAnchor-sc-dkg8my-12";

    pub const COMPANY: &str = "a.CompactOpportunityCardsc__CompanyLink-sc-dkg8my-14";
    pub const SALARY: &str = "span.CompactOpportunityCardsc__SalaryWrapper-sc-dkg8my-29";
    pub const LOCATION: &str = "div.CompactOpportunityCardsc__OpportunityInfo-sc-dkg8my-16 span";
    pub const FRESHNESS: &str = "span.CompactOpportunityCardsc__UpdatedAtMessage-sc-dkg8my-26";
}

/// Job detail page
pub mod detail {
    /// Present once the job overview has rendered
    pub const LANDMARK: &str = ".TopFoldsc__JobOverViewTitle-sc-1fbktg5-3";

    pub const TITLE: &str = "h1.TopFoldsc__JobOverViewTitle-sc-1fbktg5-3";
    pub const SALARY: &str = ".TopFoldsc__BasicSalary-sc-1fbktg5-13";
    /// Whole info row; its icon carries no text
    pub const JOB_TYPE: &str = "div.TopFoldsc__JobOverViewInfo-sc-1fbktg5-9:nth-child(3)";
    pub const EDUCATION: &str = "div.TopFoldsc__JobOverViewInfo-sc-1fbktg5-9:nth-child(4) > span:nth-child(2)";
    pub const EXPERIENCE: &str = "div.TopFoldsc__JobOverViewInfo-sc-1fbktg5-9:nth-child(5)";
    pub const FRESHNESS: &str = "span.TopFoldsc__PostedAt-sc-1fbktg5-24";

    pub const SKILLS_CONTAINER: &str = "div.Opportunitysc__SkillsContainer-sc-gb4ubh-10";
    pub const SKILL_TAG: &str = "label.TagStyle__TagContent-sc-66xi2f-0";
    pub const REQUIREMENT_TAG: &str = "div.JobRequirementssc__Tag-sc-15g5po6-3";

    pub const PROVINCE: &str = "label.BreadcrumbStyle__BreadcrumbItemWrapper-sc-eq3cq-0:nth-child(3) > a:nth-child(1)";
    pub const CITY: &str = "label.BreadcrumbStyle__BreadcrumbItemWrapper-sc-eq3cq-0:nth-child(4) > a:nth-child(1)";
    pub const DISTRICT: &str = "label.BreadcrumbStyle__BreadcrumbItemWrapper-sc-eq3cq-0:nth-child(5) > a:nth-child(1)";

    pub const COMPANY_NAME: &str = ".AboutCompanySectionsc__Title-sc-c7oevo-6 > a:nth-child(2)";
    pub const COMPANY_INDUSTRY: &str = ".AboutCompanySectionsc__CompanyIndustryAndSize-sc-c7oevo-7 > span:nth-child(1)";
    pub const COMPANY_SIZE: &str = ".AboutCompanySectionsc__CompanyIndustryAndSize-sc-c7oevo-7 > span:nth-child(3)";

    pub const DESCRIPTION: &str = "div.DraftjsReadersc__ContentContainer-sc-zm0o3p-0";
}

/// Login page
pub mod login {
    /// Switches the login modal to email + password
    pub const EMAIL_LOGIN_LINK: &str = "a.LinkStyle__StyledLink-sc-usx229-0:nth-child(3)";
    pub const EMAIL_INPUT: &str = "#login-form-email";
    pub const PASSWORD_INPUT: &str = "#login-form-password";
    pub const SUBMIT: &str = ".ButtonStyle__SolidShadowBtn-sc-jyb3o2-3";

    /// Shown when the credentials are rejected
    pub const ERROR: &str = ".ParagraphStyles__Paragraph-sc-1w5f8q5-0";

    /// Shown in the header once logged in
    pub const USER_MENU: &str = ".UserMenuComponentssc__NameHolder-sc-ovl5x6-4";
}

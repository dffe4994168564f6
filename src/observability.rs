use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("wayfinder.client.requests");
pub(crate) static CLIENT_UPLOADS: Counter = Counter::new("wayfinder.client.uploads");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("wayfinder.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("wayfinder.client.request_duration_seconds");

pub(crate) static REPLY_NAMED_FIELDS: Counter = Counter::new("wayfinder.reply.named_fields");
pub(crate) static REPLY_PRETTY_JSON: Counter = Counter::new("wayfinder.reply.pretty_json");
pub(crate) static REPLY_RAW_TEXT: Counter = Counter::new("wayfinder.reply.raw_text");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("wayfinder.session.submissions");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("wayfinder.session.replies");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("wayfinder.session.failures");

pub(crate) static IDENTITY_SIGN_INS: Counter = Counter::new("wayfinder.identity.sign_ins");
pub(crate) static IDENTITY_REFRESHES: Counter = Counter::new("wayfinder.identity.refreshes");
pub(crate) static IDENTITY_FAILURES: Counter = Counter::new("wayfinder.identity.failures");

pub(crate) static PROFILE_FETCHES: Counter = Counter::new("wayfinder.profile.fetches");
pub(crate) static PROFILE_MISSES: Counter = Counter::new("wayfinder.profile.misses");
pub(crate) static PROFILE_ERRORS: Counter = Counter::new("wayfinder.profile.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_UPLOADS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&REPLY_NAMED_FIELDS);
    collector.register_counter(&REPLY_PRETTY_JSON);
    collector.register_counter(&REPLY_RAW_TEXT);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_FAILURES);

    collector.register_counter(&IDENTITY_SIGN_INS);
    collector.register_counter(&IDENTITY_REFRESHES);
    collector.register_counter(&IDENTITY_FAILURES);

    collector.register_counter(&PROFILE_FETCHES);
    collector.register_counter(&PROFILE_MISSES);
    collector.register_counter(&PROFILE_ERRORS);
}

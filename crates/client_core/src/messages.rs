//! Localized string tables for the journey flow.

use shared::domain::{ActivationChannel, GeneRole, Language};

use crate::error::JourneyErrorKind;

#[derive(Debug)]
pub struct Messages {
    pub intro_title: &'static str,
    pub intro_subtitle: &'static str,
    pub intro_cta: &'static str,
    pub prep_title: &'static str,
    pub prep_points: [&'static str; 3],
    pub begin_scenarios: &'static str,
    pub starting: &'static str,
    pub scenario_progress: &'static str,
    pub auto_next_hint: &'static str,
    pub safety_title: &'static str,
    pub safety_subtitle: &'static str,
    pub safety_scale_hint: &'static str,
    pub see_results: &'static str,
    pub loading: &'static str,
    pub results_title: &'static str,
    pub results_subtitle: &'static str,
    pub archetypes_title: &'static str,
    pub to_activation: &'static str,
    pub activation_title: &'static str,
    pub activation_subtitle: &'static str,
    pub selected: &'static str,
    pub finish: &'static str,
    pub saving: &'static str,
    pub closing_title: &'static str,
    pub closing_body: &'static str,
    pub restart: &'static str,
    pub exit_journey: &'static str,
    pub exit_confirm: &'static str,
    pub start_error: &'static str,
    pub resume_error: &'static str,
    pub answer_all_scenarios: &'static str,
    pub submit_error: &'static str,
    pub safety_score_required: &'static str,
    pub select_activation_prompt: &'static str,
    pub activation_save_error: &'static str,
    pub role_dominant: &'static str,
    pub role_secondary: &'static str,
    pub role_support: &'static str,
    pub channel_behavior: &'static str,
    pub channel_reflection: &'static str,
    pub channel_social: &'static str,
}

static EN: Messages = Messages {
    intro_title: "Discover Your Genes",
    intro_subtitle: "A short journey through everyday scenarios.",
    intro_cta: "Start Journey",
    prep_title: "Before You Begin",
    prep_points: [
        "Answer with what you would actually do, not what you should do.",
        "There are no right or wrong answers.",
        "Each choice moves you on automatically.",
    ],
    begin_scenarios: "Begin Scenarios",
    starting: "Starting...",
    scenario_progress: "Scenario",
    auto_next_hint: "Your choice moves you to the next scenario automatically.",
    safety_title: "Psychological Safety Check",
    safety_subtitle: "How safe did you feel answering honestly?",
    safety_scale_hint: "1 = not safe at all, 5 = completely safe",
    see_results: "See My Results",
    loading: "Calculating your results...",
    results_title: "Your Gene Results",
    results_subtitle: "These are the strongest patterns in your answers.",
    archetypes_title: "Closest Archetypes",
    to_activation: "Choose Activation",
    activation_title: "Pick One Activation",
    activation_subtitle: "Choose one small action to try this week.",
    selected: "Selected",
    finish: "Finish Journey",
    saving: "Saving...",
    closing_title: "Journey Complete",
    closing_body: "Thank you for taking the journey.",
    restart: "Start Again",
    exit_journey: "Exit Journey",
    exit_confirm: "Leave the journey? Your answers will be discarded.",
    start_error: "Could not start the journey. Please try again.",
    resume_error: "Could not resume that journey. Please start a new one.",
    answer_all_scenarios: "Please answer every scenario before continuing.",
    submit_error: "Could not submit your answers. Please review them and try again.",
    safety_score_required: "Please choose a score from 1 to 5.",
    select_activation_prompt: "Please choose one activation to finish.",
    activation_save_error: "Could not save your activation. Please try again.",
    role_dominant: "Dominant",
    role_secondary: "Secondary",
    role_support: "Support",
    channel_behavior: "Behavior",
    channel_reflection: "Reflection",
    channel_social: "Social",
};

static AR: Messages = Messages {
    intro_title: "اكتشف جيناتك",
    intro_subtitle: "رحلة قصيرة عبر مواقف يومية.",
    intro_cta: "ابدأ الرحلة",
    prep_title: "قبل أن تبدأ",
    prep_points: [
        "أجب بما ستفعله فعلاً، لا بما يجب أن تفعله.",
        "لا توجد إجابات صحيحة أو خاطئة.",
        "كل اختيار ينقلك تلقائياً إلى الموقف التالي.",
    ],
    begin_scenarios: "ابدأ المواقف",
    starting: "جارٍ البدء...",
    scenario_progress: "الموقف",
    auto_next_hint: "اختيارك ينقلك تلقائياً إلى الموقف التالي.",
    safety_title: "فحص الأمان النفسي",
    safety_subtitle: "إلى أي حد شعرت بالأمان للإجابة بصدق؟",
    safety_scale_hint: "1 = غير آمن إطلاقاً، 5 = آمن تماماً",
    see_results: "اعرض نتائجي",
    loading: "جارٍ حساب نتائجك...",
    results_title: "نتائج جيناتك",
    results_subtitle: "هذه أقوى الأنماط في إجاباتك.",
    archetypes_title: "أقرب النماذج",
    to_activation: "اختر التفعيل",
    activation_title: "اختر تفعيلاً واحداً",
    activation_subtitle: "اختر خطوة صغيرة لتجربتها هذا الأسبوع.",
    selected: "تم الاختيار",
    finish: "أنهِ الرحلة",
    saving: "جارٍ الحفظ...",
    closing_title: "اكتملت الرحلة",
    closing_body: "شكراً لمشاركتك في الرحلة.",
    restart: "ابدأ من جديد",
    exit_journey: "الخروج من الرحلة",
    exit_confirm: "هل تريد مغادرة الرحلة؟ سيتم تجاهل إجاباتك.",
    start_error: "تعذر بدء الرحلة. حاول مرة أخرى.",
    resume_error: "تعذر استئناف هذه الرحلة. ابدأ رحلة جديدة.",
    answer_all_scenarios: "يرجى الإجابة على كل المواقف قبل المتابعة.",
    submit_error: "تعذر إرسال إجاباتك. راجعها وحاول مرة أخرى.",
    safety_score_required: "يرجى اختيار درجة من 1 إلى 5.",
    select_activation_prompt: "يرجى اختيار تفعيل واحد للإنهاء.",
    activation_save_error: "تعذر حفظ التفعيل. حاول مرة أخرى.",
    role_dominant: "مهيمن",
    role_secondary: "ثانوي",
    role_support: "داعم",
    channel_behavior: "سلوك",
    channel_reflection: "تأمل",
    channel_social: "اجتماعي",
};

impl Messages {
    pub fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }

    pub fn error(&self, kind: JourneyErrorKind) -> &'static str {
        match kind {
            JourneyErrorKind::StartFailed => self.start_error,
            JourneyErrorKind::ResumeFailed => self.resume_error,
            JourneyErrorKind::SubmitFailed => self.submit_error,
            JourneyErrorKind::ActivationSaveFailed => self.activation_save_error,
            JourneyErrorKind::IncompleteAnswers => self.answer_all_scenarios,
            JourneyErrorKind::MissingSafetyScore => self.safety_score_required,
            JourneyErrorKind::MissingActivation => self.select_activation_prompt,
        }
    }

    /// Falls back to the service's raw role text when the role is unknown.
    pub fn gene_role<'a>(&self, role: Option<GeneRole>, raw: &'a str) -> &'a str {
        match role {
            Some(GeneRole::Dominant) => self.role_dominant,
            Some(GeneRole::Secondary) => self.role_secondary,
            Some(GeneRole::Support) => self.role_support,
            None => raw,
        }
    }

    pub fn channel<'a>(&self, channel: Option<ActivationChannel>, raw: &'a str) -> &'a str {
        match channel {
            Some(ActivationChannel::Behavior) => self.channel_behavior,
            Some(ActivationChannel::Reflection) => self.channel_reflection,
            Some(ActivationChannel::Social) => self.channel_social,
            None => raw,
        }
    }
}

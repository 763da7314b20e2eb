//! Localized assistant replies

use carelink_core::{Category, Language, PromptKey};

/// Reply strings for one language
#[derive(Debug)]
pub struct PromptTable {
    pub welcome: &'static str,
    /// Contains a `{category}` placeholder
    pub searching_resources: &'static str,
    /// Contains a `{category}` placeholder
    pub clarification_prefix: &'static str,
    pub need_more_info: &'static str,
    pub offer_personal_help: &'static str,
    /// Indexed like [`Category::ALL`]
    clarifications: [&'static str; 8],
    /// Indexed like [`Category::ALL`]
    category_labels: [&'static str; 8],
}

fn index(category: Category) -> usize {
    Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default()
}

impl PromptTable {
    /// Category-specific clarification question
    pub fn clarification(&self, category: Category) -> &'static str {
        self.clarifications[index(category)]
    }

    /// Category name as shown inside sentences
    pub fn category_label(&self, category: Category) -> &'static str {
        self.category_labels[index(category)]
    }
}

/// Prompt table for a language
pub fn table(language: Language) -> &'static PromptTable {
    match language {
        Language::En => &EN,
        Language::Es => &ES,
        Language::So => &SO,
        Language::Ar => &AR,
        Language::Hi => &HI,
    }
}

/// Render the reply for a prompt key, substituting the localized category
/// label. Blank entries fall back to English.
pub fn render(language: Language, key: PromptKey) -> String {
    let local = table(language);
    let pick = |text: &'static str, english: &'static str| -> &'static str {
        if text.trim().is_empty() {
            english
        } else {
            text
        }
    };
    let label = |category: Category| {
        pick(local.category_label(category), EN.category_label(category))
    };

    match key {
        PromptKey::Welcome => pick(local.welcome, EN.welcome).to_string(),
        PromptKey::NeedMoreInfo => pick(local.need_more_info, EN.need_more_info).to_string(),
        PromptKey::OfferPersonalHelp => {
            pick(local.offer_personal_help, EN.offer_personal_help).to_string()
        }
        PromptKey::Clarify(category) => {
            pick(local.clarification(category), EN.clarification(category)).to_string()
        }
        PromptKey::SearchingResources(category) => {
            pick(local.searching_resources, EN.searching_resources)
                .replace("{category}", label(category))
        }
        PromptKey::ClarificationConfirmed(category) => {
            pick(local.clarification_prefix, EN.clarification_prefix)
                .replace("{category}", label(category))
        }
    }
}

static EN: PromptTable = PromptTable {
    welcome: "I can help you find resources for food, housing, healthcare, mental health, substance use treatment, employment, veteran services, or crisis support. What do you need help with?",
    searching_resources: "Looking for {category} resources in your area...",
    clarification_prefix: "Great! Looking for {category} resources in your area...",
    need_more_info: "I want to make sure I understand what you need. Could you tell me more specifically what kind of help you're looking for?",
    offer_personal_help: "Let us connect you with someone who can provide personal assistance.",
    clarifications: [
        "It sounds like you might need food assistance. Would you like to see food pantries, soup kitchens, or meal programs?",
        "Are you looking for emergency shelter, housing assistance, or help with rent?",
        "Do you need medical care, dental services, or help finding health insurance?",
        "Are you interested in counseling, therapy, or mental health support services?",
        "Are you looking for detox services, recovery programs, or ongoing addiction support?",
        "Would you like job training, resume help, or employment placement services?",
        "Are you looking for VA benefits, veteran housing, or veteran healthcare services?",
        "Do you need immediate crisis support, a suicide hotline, or emergency assistance?",
    ],
    category_labels: [
        "food",
        "housing",
        "healthcare",
        "mental health",
        "substance use",
        "employment",
        "veterans",
        "crisis",
    ],
};

static ES: PromptTable = PromptTable {
    welcome: "Puedo ayudarte a encontrar recursos para alimentación, vivienda, atención médica, salud mental, tratamiento de sustancias, empleo, servicios para veteranos, o apoyo en crisis. ¿Con qué necesitas ayuda?",
    searching_resources: "Buscando recursos de {category} en tu área...",
    clarification_prefix: "¡Perfecto! Buscando recursos de {category} en tu área...",
    need_more_info: "Quiero asegurarme de entender lo que necesitas. ¿Podrías decirme más específicamente qué tipo de ayuda buscas?",
    offer_personal_help: "Permítenos conectarte con alguien que pueda brindarte asistencia personal.",
    clarifications: [
        "Parece que podrías necesitar asistencia alimentaria. ¿Te gustaría ver bancos de alimentos, comedores populares, o programas de comidas?",
        "¿Buscas refugio de emergencia, asistencia de vivienda, o ayuda con el alquiler?",
        "¿Necesitas atención médica, servicios dentales, o ayuda para encontrar seguro médico?",
        "¿Te interesan servicios de consejería, terapia, o apoyo de salud mental?",
        "¿Buscas servicios de desintoxicación, programas de recuperación, o apoyo continuo para adicciones?",
        "¿Te gustaría capacitación laboral, ayuda con currículum, o servicios de colocación laboral?",
        "¿Buscas beneficios de VA, vivienda para veteranos, o servicios de atención médica para veteranos?",
        "¿Necesitas apoyo inmediato en crisis, una línea de crisis, o asistencia de emergencia?",
    ],
    category_labels: [
        "alimentación",
        "vivienda",
        "atención médica",
        "salud mental",
        "abuso de sustancias",
        "empleo",
        "veteranos",
        "crisis",
    ],
};

static SO: PromptTable = PromptTable {
    welcome: "Waxaan kaa caawin karaa in aad hesho agab loogu talagalay cunto, guri, daryeel caafimaad, caafimaadka maskaxda, daawaynta isticmaalka daroogada, shaqo, adeegyada askarta, ama taageerada xiisadaha. Maxaad u baahan tahay caawimo?",
    searching_resources: "Waan baadhayaa agabka {category} ee agagaaga ku yaal...",
    clarification_prefix: "Fiican! Waan raadiyaa agabka {category} ee agagaaga ku yaal...",
    need_more_info: "Waxaan doonayaa inaan hubsado waxa aad u baahan tahay. Miyaad ii sheegi kartaa si tafatiran waxa aad raadinayso?",
    offer_personal_help: "Waxaan kuu ogolaaneyn in aan ku xidhno qof ku siinaya caawimo shakhsi ah.",
    clarifications: [
        "Waxay umuuqataa inaad u baahan tahay caawimo cunto. Miyaad jeclaan lahayd inaad aragto bangiyada cuntada, matbakhyada guud, ama barnaamijyada cuntada?",
        "Miyaad raadinaysaa meel galabni ah oo degdeg ah, caawimo guri, ama caawimo kiro?",
        "Miyaad u baahan tahay daryeel caafimaad, adeegyada ilkaha, ama caawimo si aad u hesho caymis caafimaad?",
        "Miyaad xiisaynaysaa adeegyada la-talinta, daaweynta, ama taageerada caafimaadka maskaxda?",
        "Miyaad raadinaysaa adeegyada nadiifeynta jidhka, barnaamijyada soo kabashadhka, ama taageero joogto ah ee iska-ceejinta?",
        "Miyaad jeclaan lahayd tababar shaqo, caawimo resume, ama adeegyada heleynta shaqo?",
        "Miyaad raadinaysaa faa'iidooyinka VA, guri askari, ama adeegyada daryeelka caafimaadka askarta?",
        "Miyaad u baahan tahay taageero degdeg ah oo xiisad ah, khadka xiisadaha, ama caawimo degdeg ah?",
    ],
    category_labels: [
        "cunto",
        "guri",
        "daryeel caafimaad",
        "caafimaadka maskaxda",
        "isticmaalka daroogada",
        "shaqo",
        "askarta hore",
        "xiisad",
    ],
};

static AR: PromptTable = PromptTable {
    welcome: "يمكنني مساعدتك في العثور على موارد للطعام والإسكان والرعاية الصحية والصحة النفسية وعلاج تعاطي المواد والتوظيف وخدمات المحاربين القدامى أو دعم الأزمات. بماذا تحتاج المساعدة؟",
    searching_resources: "البحث عن موارد {category} في منطقتك...",
    clarification_prefix: "ممتاز! البحث عن موارد {category} في منطقتك...",
    need_more_info: "أريد التأكد من فهم ما تحتاجه. هل يمكنك إخباري بشكل أكثر تحديداً عن نوع المساعدة التي تبحث عنها؟",
    offer_personal_help: "دعنا نربطك بشخص يمكنه تقديم المساعدة الشخصية.",
    clarifications: [
        "يبدو أنك قد تحتاج إلى مساعدة غذائية. هل تود رؤية بنوك الطعام أو مطابخ الحساء أو برامج الوجبات؟",
        "هل تبحث عن مأوى طارئ أو مساعدة في الإسكان أو مساعدة في الإيجار؟",
        "هل تحتاج رعاية طبية أو خدمات أسنان أو مساعدة في العثور على تأمين صحي؟",
        "هل أنت مهتم بخدمات الاستشارة أو العلاج أو خدمات دعم الصحة النفسية؟",
        "هل تبحث عن خدمات إزالة السموم أو برامج التعافي أو الدعم المستمر للإدمان؟",
        "هل تود التدريب المهني أو مساعدة في السيرة الذاتية أو خدمات التوظيف؟",
        "هل تبحث عن مزايا VA أو إسكان المحاربين القدامى أو خدمات الرعاية الصحية للمحاربين القدامى؟",
        "هل تحتاج دعم أزمة فوري أو خط أزمة أو مساعدة طارئة؟",
    ],
    category_labels: [
        "طعام",
        "إسكان",
        "رعاية صحية",
        "صحة نفسية",
        "تعاطي المواد",
        "توظيف",
        "محاربون قدامى",
        "أزمة",
    ],
};

static HI: PromptTable = PromptTable {
    welcome: "मैं आपको भोजन, आवास, स्वास्थ्य देखभाल, मानसिक स्वास्थ्य, पदार्थ उपयोग उपचार, रोजगार, वयोवृद्ध सेवाओं, या संकट सहायता के लिए संसाधन खोजने में मदद कर सकता हूं। आपको किस चीज़ में मदद चाहिए?",
    searching_resources: "आपके क्षेत्र में {category} संसाधन खोज रहे हैं...",
    clarification_prefix: "बहुत बढ़िया! आपके क्षेत्र में {category} संसाधन खोज रहे हैं...",
    need_more_info: "मैं यह सुनिश्चित करना चाहता हूं कि मैं समझ गया हूं कि आपको क्या चाहिए। क्या आप मुझे और विशेष रूप से बता सकते हैं कि आप किस प्रकार की मदद की तलाश कर रहे हैं?",
    offer_personal_help: "आइए हम आपको किसी ऐसे व्यक्ति से जोड़ते हैं जो व्यक्तिगत सहायता प्रदान कर सकता है।",
    clarifications: [
        "ऐसा लगता है कि आपको भोजन सहायता की आवश्यकता हो सकती है। क्या आप फूड बैंक, सूप किचन, या भोजन कार्यक्रम देखना चाहेंगे?",
        "क्या आप आपातकालीन आश्रय, आवास सहायता, या किराए में मदद की तलाश कर रहे हैं?",
        "क्या आपको चिकित्सा देखभाल, दंत सेवाओं, या स्वास्थ्य बीमा खोजने में मदद चाहिए?",
        "क्या आप परामर्श, चिकित्सा, या मानसिक स्वास्थ्य सहायता सेवाओं में रुचि रखते हैं?",
        "क्या आप डिटॉक्स सेवाओं, रिकवरी प्रोग्राम, या निरंतर लत समर्थन की तलाश कर रहे हैं?",
        "क्या आप नौकरी प्रशिक्षण, रिज्यूमे मदद, या रोजगार नियुक्ति सेवाओं को पसंद करेंगे?",
        "क्या आप VA लाभ, वयोवृद्ध आवास, या वयोवृद्ध स्वास्थ्य देखभाल सेवाओं की तलाश कर रहे हैं?",
        "क्या आपको तत्काल संकट सहायता, एक संकट हॉटलाइन, या आपातकालीन सहायता चाहिए?",
    ],
    category_labels: [
        "भोजन",
        "आवास",
        "स्वास्थ्य देखभाल",
        "मानसिक स्वास्थ्य",
        "पदार्थ उपयोग",
        "रोजगार",
        "पूर्व सैनिक",
        "संकट",
    ],
};

//! Prompt framework validator.
//!
//! Checks a learner's prompt for the five framework elements taught in the
//! course (role, goal, steps, constraints, quality bar) and turns the matches
//! into a score, a quality level and up to three suggestions.
//!
//! The check is a pure function over the text: every pattern is tested
//! independently and a match anywhere in the prompt counts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKey {
    Role,
    Goal,
    Steps,
    Constraints,
    QualityBar,
}

impl ElementKey {
    /// Fixed iteration order; detection, suggestions and checklists follow it.
    pub const ALL: [ElementKey; 5] = [
        ElementKey::Role,
        ElementKey::Goal,
        ElementKey::Steps,
        ElementKey::Constraints,
        ElementKey::QualityBar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKey::Role => "role",
            ElementKey::Goal => "goal",
            ElementKey::Steps => "steps",
            ElementKey::Constraints => "constraints",
            ElementKey::QualityBar => "quality_bar",
        }
    }

    pub fn element(self) -> &'static FrameworkElement {
        &ELEMENTS[self as usize]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkElement {
    pub key: ElementKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub suggestions: [&'static str; 2],
    #[serde(skip)]
    pattern: Regex,
}

impl FrameworkElement {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn element(
    key: ElementKey,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    suggestions: [&'static str; 2],
    pattern: &str,
) -> FrameworkElement {
    FrameworkElement {
        key,
        name,
        icon,
        description,
        suggestions,
        pattern: Regex::new(pattern).expect("framework pattern must compile"),
    }
}

// Indexed by `ElementKey as usize`.
static ELEMENTS: Lazy<[FrameworkElement; 5]> = Lazy::new(|| {
    [
        element(
            ElementKey::Role,
            "Роль",
            "🎭",
            "Кем должна быть модель: эксперт, менеджер, аналитик",
            [
                "Назначьте модели роль: «Ты — опытный аналитик службы поддержки».",
                "Уточните экспертизу роли: опыт, отрасль и для кого она работает.",
            ],
            r"(?i)(\bты\s*[—–-]|\bвы\s*[—–-]|\bты\s+(опытн|профессиональн|старш|ведущ)|в\s+роли|выступ\w*\s+как|представь,?\s+что\s+ты|customer\s+success|менеджер|эксперт|специалист|аналитик|консультант|маркетолог|редактор|act\s+as|you\s+are)",
        ),
        element(
            ElementKey::Goal,
            "Цель",
            "🎯",
            "Какой результат нужен и зачем",
            [
                "Сформулируйте цель: «Цель — выявить три главные причины жалоб».",
                "Опишите, какой результат нужен и где он будет использован.",
            ],
            r"(?i)(цел[ьи]|задач|должен|должна|нужно|необходимо|требуется|выяви|проанализ|сформулируй|подготовь|\bgoal\b|objective)",
        ),
        element(
            ElementKey::Steps,
            "Шаги",
            "🪜",
            "Порядок работы: что сделать сначала, что потом",
            [
                "Разбейте задачу на шаги: «Шаг 1: …, Шаг 2: …».",
                "Укажите порядок работы: что сделать сначала, что затем.",
            ],
            r"(?im)(шаг\s*\d+|этап\s*\d+|step\s*\d+|во-первых|во-вторых|сначала|затем|после\s+этого|в\s+конце|первым\s+делом|\bперв(ый|ое|ая)\b|\bвтор(ой|ое|ая)\b|\bтрет(ий|ье|ья)\b|^\s*\d+[.)]\s)",
        ),
        element(
            ElementKey::Constraints,
            "Ограничения",
            "🚧",
            "Рамки ответа: объём, формат, чего избегать",
            [
                "Добавьте ограничения: «Не более 200 слов».",
                "Задайте формат ответа: список, таблица или bullet points.",
            ],
            r"(?i)(ограничени|не\s+более|не\s+больше|не\s+длиннее|не\s+превыша|максимум|минимум|не\s+использу|\d+\s*(слов|символ|знак|предложени|абзац|пункт|строк)|формат|bullet|списком|таблиц|\blimit)",
        ),
        element(
            ElementKey::QualityBar,
            "Планка качества",
            "✅",
            "Как модель проверит свой ответ перед отправкой",
            [
                "Попросите модель проверить ответ: «Перед отправкой убедись, что…».",
                "Опишите критерии качества, по которым модель оценит свой ответ.",
            ],
            r"(?i)(качеств|провер|убедись|убедит|критери|review|critique|self-check|double-check)",
        ),
    ]
});

pub fn elements() -> &'static [FrameworkElement] {
    &ELEMENTS[..]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
}

impl QualityLevel {
    pub fn from_score(score: usize) -> Self {
        match score {
            s if s >= 4 => QualityLevel::High,
            s if s >= 2 => QualityLevel::Medium,
            _ => QualityLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub detected_elements: Vec<ElementKey>,
    pub missing_elements: Vec<ElementKey>,
    pub suggestions: Vec<String>,
    pub score: usize,
    pub quality_level: QualityLevel,
    pub is_complete: bool,
}

impl ValidationResult {
    pub fn has(&self, key: ElementKey) -> bool {
        self.detected_elements.contains(&key)
    }
}

pub fn validate(prompt_text: &str) -> ValidationResult {
    let (detected, missing): (Vec<ElementKey>, Vec<ElementKey>) = ElementKey::ALL
        .iter()
        .partition(|key| key.element().matches(prompt_text));

    let suggestions = missing
        .iter()
        .flat_map(|key| key.element().suggestions.iter())
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect();

    let score = detected.len();
    ValidationResult {
        detected_elements: detected,
        missing_elements: missing,
        suggestions,
        score,
        quality_level: QualityLevel::from_score(score),
        is_complete: score == ElementKey::ALL.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PROMPT: &str = "Ты — customer success менеджер. Цель: выявить топ-3 темы. \
        Шаг 1: прочитай отзывы. Не более 200 слов. Проверь ответ перед отправкой.";

    fn check_invariants(result: &ValidationResult) {
        assert_eq!(result.score, result.detected_elements.len());
        assert_eq!(
            result.detected_elements.len() + result.missing_elements.len(),
            5
        );
        assert!(result
            .detected_elements
            .iter()
            .all(|k| !result.missing_elements.contains(k)));
        assert!(result.suggestions.len() <= MAX_SUGGESTIONS);
        assert_eq!(result.is_complete, result.score == 5);
        assert_eq!(result.quality_level, QualityLevel::from_score(result.score));
    }

    #[test]
    fn test_table_is_indexed_by_key() {
        for key in ElementKey::ALL {
            assert_eq!(key.element().key, key);
        }
        assert_eq!(elements().len(), 5);
    }

    #[test]
    fn test_empty_prompt() {
        let result = validate("");
        check_invariants(&result);
        assert!(result.detected_elements.is_empty());
        assert_eq!(result.missing_elements, ElementKey::ALL.to_vec());
        assert_eq!(result.score, 0);
        assert_eq!(result.quality_level, QualityLevel::Low);
        assert!(!result.is_complete);
        assert_eq!(result.suggestions.len(), 3);
    }

    #[test]
    fn test_full_prompt() {
        let result = validate(FULL_PROMPT);
        check_invariants(&result);
        assert_eq!(result.detected_elements, ElementKey::ALL.to_vec());
        assert!(result.missing_elements.is_empty());
        assert!(result.suggestions.is_empty());
        assert_eq!(result.score, 5);
        assert_eq!(result.quality_level, QualityLevel::High);
        assert!(result.is_complete);
    }

    #[test]
    fn test_steps_only() {
        let result = validate("Шаг 1: сделай что-нибудь");
        check_invariants(&result);
        assert_eq!(result.detected_elements, vec![ElementKey::Steps]);
        assert_eq!(
            result.missing_elements,
            vec![
                ElementKey::Role,
                ElementKey::Goal,
                ElementKey::Constraints,
                ElementKey::QualityBar
            ]
        );
        assert_eq!(result.score, 1);
        assert_eq!(result.quality_level, QualityLevel::Low);

        let role = ElementKey::Role.element();
        let goal = ElementKey::Goal.element();
        assert_eq!(
            result.suggestions,
            vec![role.suggestions[0], role.suggestions[1], goal.suggestions[0]]
        );
    }

    #[test]
    fn test_word_limit_is_constraint() {
        let result = validate("максимум 100 слов");
        check_invariants(&result);
        assert_eq!(result.detected_elements, vec![ElementKey::Constraints]);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_case_insensitive_cyrillic() {
        assert!(validate("ТЫ — МЕНЕДЖЕР").has(ElementKey::Role));
        assert!(validate("ты — менеджер").has(ElementKey::Role));
        assert!(validate("ЭТАП 2").has(ElementKey::Steps));
        assert!(validate("Please REVIEW the answer").has(ElementKey::QualityBar));
    }

    #[test]
    fn test_numbered_list_counts_as_steps() {
        let result = validate("Сделай так:\n1. прочитай\n2. сгруппируй");
        assert!(result.has(ElementKey::Steps));
    }

    #[test]
    fn test_quality_levels() {
        assert_eq!(QualityLevel::from_score(0), QualityLevel::Low);
        assert_eq!(QualityLevel::from_score(1), QualityLevel::Low);
        assert_eq!(QualityLevel::from_score(2), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(3), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(4), QualityLevel::High);
        assert_eq!(QualityLevel::from_score(5), QualityLevel::High);
    }

    #[test]
    fn test_medium_prompt() {
        let result = validate("Ты — аналитик. Задача: найди повторяющиеся жалобы.");
        check_invariants(&result);
        assert_eq!(
            result.detected_elements,
            vec![ElementKey::Role, ElementKey::Goal]
        );
        assert_eq!(result.quality_level, QualityLevel::Medium);
        assert_eq!(
            result.suggestions,
            vec![
                ElementKey::Steps.element().suggestions[0],
                ElementKey::Steps.element().suggestions[1],
                ElementKey::Constraints.element().suggestions[0],
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        for text in ["", FULL_PROMPT, "Шаг 1: сделай что-нибудь", "random text"] {
            assert_eq!(validate(text), validate(text));
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(validate("Шаг 1")).unwrap();
        assert_eq!(json["detectedElements"][0], "steps");
        assert_eq!(json["qualityLevel"], "low");
        assert_eq!(json["isComplete"], false);
        assert_eq!(json["missingElements"][4], "quality_bar");
    }
}

//! Interactive labs.
//!
//! A lab is a sequence of rounds. Each round names the framework elements
//! that matter for it; the validator always checks all five and
//! [`project`] narrows its result down to the round's checklist.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chat::{ChatBackend, ChatRequest};
use crate::error::{AppError, Result};
use crate::validator::{validate, ElementKey, QualityLevel, ValidationResult};
use crate::{CONTEXT_RESCUE_PROMPT, ITERATION_COACH_PROMPT, WORKFLOW_RUNNER_PROMPT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabKind {
    ContextRescue,
    Iteration,
    Workflow,
}

impl LabKind {
    pub const ALL: [LabKind; 3] = [LabKind::ContextRescue, LabKind::Iteration, LabKind::Workflow];

    pub fn as_str(self) -> &'static str {
        match self {
            LabKind::ContextRescue => "context_rescue",
            LabKind::Iteration => "iteration",
            LabKind::Workflow => "workflow",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        LabKind::ALL
            .into_iter()
            .find(|k| k.as_str() == name || k.as_str().replace('_', "-") == name)
            .ok_or_else(|| AppError::UnknownLab(name.to_string()))
    }

    pub fn spec(self) -> &'static LabSpec {
        match self {
            LabKind::ContextRescue => &CONTEXT_RESCUE,
            LabKind::Iteration => &ITERATION,
            LabKind::Workflow => &WORKFLOW,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSpec {
    pub title: &'static str,
    pub brief: &'static str,
    pub relevant: &'static [ElementKey],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabSpec {
    pub kind: LabKind,
    pub title: &'static str,
    pub description: &'static str,
    pub rounds: &'static [RoundSpec],
    #[serde(skip)]
    pub system_prompt: &'static str,
}

impl LabSpec {
    pub fn round(&self, index: usize) -> Result<&'static RoundSpec> {
        self.rounds.get(index).ok_or(AppError::RoundOutOfRange {
            round: index,
            rounds: self.rounds.len(),
        })
    }
}

static ITERATION: LabSpec = LabSpec {
    kind: LabKind::Iteration,
    title: "Челлендж итераций",
    description: "Улучшайте один и тот же промпт три раунда подряд",
    system_prompt: ITERATION_COACH_PROMPT,
    rounds: &[
        RoundSpec {
            title: "Раунд 1: кто и зачем",
            brief: "Попросите модель разобрать отзывы клиентов. Задайте роль и цель.",
            relevant: &[ElementKey::Role, ElementKey::Goal],
        },
        RoundSpec {
            title: "Раунд 2: план работы",
            brief: "Добавьте к роли и цели пошаговый план.",
            relevant: &[ElementKey::Role, ElementKey::Goal, ElementKey::Steps],
        },
        RoundSpec {
            title: "Раунд 3: полный фреймворк",
            brief: "Добавьте ограничения и планку качества.",
            relevant: &ElementKey::ALL,
        },
    ],
};

static CONTEXT_RESCUE: LabSpec = LabSpec {
    kind: LabKind::ContextRescue,
    title: "Спасение контекста",
    description: "Диалог перерос контекстное окно. Соберите резюме для нового чата",
    system_prompt: CONTEXT_RESCUE_PROMPT,
    rounds: &[RoundSpec {
        title: "Резюме для нового чата",
        brief: "Перечислите роль, цель, принятые решения и ограничения из диалога.",
        relevant: &[ElementKey::Role, ElementKey::Goal, ElementKey::Constraints],
    }],
};

static WORKFLOW: LabSpec = LabSpec {
    kind: LabKind::Workflow,
    title: "Конструктор процесса",
    description: "Соберите рабочий процесс из шагов и запустите его",
    system_prompt: WORKFLOW_RUNNER_PROMPT,
    rounds: &[RoundSpec {
        title: "Процесс целиком",
        brief: "Соберите процесс, в котором есть все пять элементов фреймворка.",
        relevant: &ElementKey::ALL,
    }],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Green,
    Yellow,
    Red,
}

impl Badge {
    /// Green when every relevant element is present, yellow from half.
    pub fn for_score(score: usize, max: usize) -> Self {
        if score >= max {
            Badge::Green
        } else if score * 2 >= max {
            Badge::Yellow
        } else {
            Badge::Red
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub key: ElementKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub checklist: Vec<ChecklistItem>,
    pub score: usize,
    pub max: usize,
    pub badge: Badge,
    pub quality_level: QualityLevel,
    pub suggestions: Vec<String>,
}

impl RoundView {
    pub fn passed(&self) -> bool {
        self.badge == Badge::Green
    }
}

pub fn project(result: &ValidationResult, relevant: &[ElementKey]) -> RoundView {
    let checklist: Vec<ChecklistItem> = ElementKey::ALL
        .iter()
        .filter(|key| relevant.contains(*key))
        .map(|&key| {
            let element = key.element();
            ChecklistItem {
                key,
                name: element.name,
                icon: element.icon,
                present: result.has(key),
            }
        })
        .collect();

    let score = checklist.iter().filter(|item| item.present).count();
    let max = checklist.len();
    RoundView {
        checklist,
        score,
        max,
        badge: Badge::for_score(score, max),
        quality_level: result.quality_level,
        suggestions: result.suggestions.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundData {
    pub user_prompt: String,
    pub ai_response: String,
    pub framework_elements: Vec<ElementKey>,
    pub quality_score: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub lab: LabKind,
    pub round: usize,
    pub data: RoundData,
    pub view: RoundView,
    pub validation: ValidationResult,
}

fn score_round(kind: LabKind, round: usize, prompt: &str, ai_response: String) -> Result<RoundOutcome> {
    let spec = kind.spec().round(round)?;
    let validation = validate(prompt);
    let view = project(&validation, spec.relevant);
    Ok(RoundOutcome {
        lab: kind,
        round,
        data: RoundData {
            user_prompt: prompt.to_string(),
            ai_response,
            framework_elements: validation.detected_elements.clone(),
            quality_score: validation.score,
            timestamp: OffsetDateTime::now_utc(),
        },
        view,
        validation,
    })
}

/// Text sent to the model for a learner's prompt in the given lab.
pub fn chat_request(kind: LabKind, prompt: &str) -> ChatRequest {
    let text = match kind {
        LabKind::ContextRescue => rescue_prompt(prompt),
        LabKind::Iteration | LabKind::Workflow => prompt.to_string(),
    };
    ChatRequest::new(text).with_system(kind.spec().system_prompt)
}

/// Validates, asks the model and scores one round. Holds no state.
pub async fn evaluate(
    kind: LabKind,
    round: usize,
    prompt: &str,
    chat: &dyn ChatBackend,
) -> Result<RoundOutcome> {
    kind.spec().round(round)?;
    if prompt.trim().is_empty() {
        return Err(AppError::EmptyPrompt);
    }
    let ai_response = chat.complete(chat_request(kind, prompt)).await?;
    score_round(kind, round, prompt, ai_response)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "round")]
pub enum SessionState {
    Briefing,
    Drafting(usize),
    Reviewed(usize),
    Finished,
}

/// One learner's pass through a lab.
#[derive(Debug)]
pub struct LabSession {
    kind: LabKind,
    state: SessionState,
    rounds: Vec<Option<RoundData>>,
}

impl LabSession {
    pub fn new(kind: LabKind) -> Self {
        Self {
            kind,
            state: SessionState::Briefing,
            rounds: vec![None; kind.spec().rounds.len()],
        }
    }

    pub fn kind(&self) -> LabKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            action,
            state: format!("{:?}", self.state),
        }
    }

    pub fn start(&mut self) -> Result<usize> {
        match self.state {
            SessionState::Briefing => {
                self.state = SessionState::Drafting(0);
                Ok(0)
            }
            _ => Err(self.invalid("start")),
        }
    }

    pub fn current_round(&self) -> Option<&'static RoundSpec> {
        match self.state {
            SessionState::Drafting(r) | SessionState::Reviewed(r) => self.kind.spec().rounds.get(r),
            _ => None,
        }
    }

    /// Records the current round. Submitting again after review replaces the
    /// earlier attempt.
    pub fn submit(&mut self, prompt: &str, ai_response: String) -> Result<RoundOutcome> {
        let round = match self.state {
            SessionState::Drafting(r) | SessionState::Reviewed(r) => r,
            _ => return Err(self.invalid("submit")),
        };
        if prompt.trim().is_empty() {
            return Err(AppError::EmptyPrompt);
        }
        let outcome = score_round(self.kind, round, prompt, ai_response)?;
        self.rounds[round] = Some(outcome.data.clone());
        self.state = SessionState::Reviewed(round);
        Ok(outcome)
    }

    pub fn advance(&mut self) -> Result<SessionState> {
        self.state = match self.state {
            SessionState::Reviewed(r) if r + 1 < self.rounds.len() => SessionState::Drafting(r + 1),
            SessionState::Reviewed(_) => SessionState::Finished,
            _ => return Err(self.invalid("advance")),
        };
        Ok(self.state)
    }

    pub fn round_data(&self, round: usize) -> Option<&RoundData> {
        self.rounds.get(round).and_then(|r| r.as_ref())
    }

    /// Quality scores of submitted rounds, in round order.
    pub fn score_history(&self) -> Vec<usize> {
        self.rounds
            .iter()
            .flatten()
            .map(|r| r.quality_score)
            .collect()
    }
}

// Context-window rescue

pub struct TranscriptLine {
    pub speaker: &'static str,
    pub text: &'static str,
}

pub static TRANSCRIPT: &[TranscriptLine] = &[
    TranscriptLine { speaker: "Вы", text: "Ты — маркетолог интернет-магазина чая. Помоги подготовить рассылку к Новому году." },
    TranscriptLine { speaker: "Модель", text: "Отлично! Для кого рассылка и какая у неё цель?" },
    TranscriptLine { speaker: "Вы", text: "Для постоянных клиентов. Цель — продать подарочные наборы." },
    TranscriptLine { speaker: "Модель", text: "Предлагаю три письма: анонс, напоминание и последний шанс." },
    TranscriptLine { speaker: "Вы", text: "Хорошо. Скидка 15%, промокод ЧАЙ2025, не более 120 слов в письме." },
    TranscriptLine { speaker: "Модель", text: "Записал. Тон дружелюбный, без давления?" },
    TranscriptLine { speaker: "Вы", text: "Да, и без эмодзи в теме письма." },
    TranscriptLine { speaker: "Модель", text: "Первое письмо готово. Продолжим со вторым?" },
    TranscriptLine { speaker: "Вы", text: "…(ещё сорок сообщений правок)…" },
    TranscriptLine { speaker: "Модель", text: "Напомните, пожалуйста, какой у нас промокод и для какой аудитории мы пишем?" },
];

pub struct KeyFact {
    pub label: &'static str,
    pub cues: &'static [&'static str],
}

/// Facts from the transcript that a hand-off summary must carry over.
pub static KEY_FACTS: &[KeyFact] = &[
    KeyFact { label: "Роль: маркетолог чайного магазина", cues: &["маркетолог"] },
    KeyFact { label: "Аудитория: постоянные клиенты", cues: &["постоянн"] },
    KeyFact { label: "Цель: продать подарочные наборы", cues: &["подароч", "набор"] },
    KeyFact { label: "Скидка 15% и промокод ЧАЙ2025", cues: &["15", "чай2025"] },
    KeyFact { label: "Не более 120 слов в письме", cues: &["120"] },
    KeyFact { label: "Без эмодзи в теме", cues: &["эмодзи"] },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueReport {
    pub kept: Vec<&'static str>,
    pub lost: Vec<&'static str>,
    pub validation: ValidationResult,
}

impl RescueReport {
    pub fn complete(&self) -> bool {
        self.lost.is_empty()
    }
}

/// A fact is kept when any of its cues appears in the summary.
pub fn check_summary(summary: &str) -> RescueReport {
    let lowered = summary.to_lowercase();
    let (kept, lost): (Vec<&KeyFact>, Vec<&KeyFact>) = KEY_FACTS
        .iter()
        .partition(|fact| fact.cues.iter().any(|cue| lowered.contains(cue)));
    RescueReport {
        kept: kept.iter().map(|f| f.label).collect(),
        lost: lost.iter().map(|f| f.label).collect(),
        validation: validate(summary),
    }
}

pub fn rescue_prompt(summary: &str) -> String {
    format!(
        "Продолжаем работу из предыдущего чата. Вот резюме всего, о чём мы договорились:\n\n{}\n\n\
         Коротко перескажи контекст своими словами и задай вопросы, если чего-то не хватает.",
        summary.trim()
    )
}

// Workflow builder

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub title: String,
    #[serde(default)]
    pub instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowBuilder {
    pub role: String,
    pub goal: String,
    pub steps: Vec<WorkflowStep>,
    pub constraints: String,
    pub quality_check: String,
}

impl WorkflowBuilder {
    pub fn new(role: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            ..Self::default()
        }
    }

    pub fn add_step(&mut self, title: impl Into<String>, instruction: impl Into<String>) -> usize {
        self.steps.push(WorkflowStep {
            title: title.into(),
            instruction: instruction.into(),
        });
        self.steps.len() - 1
    }

    pub fn remove_step(&mut self, index: usize) -> Result<WorkflowStep> {
        if index >= self.steps.len() {
            return Err(AppError::UnknownStep { index });
        }
        Ok(self.steps.remove(index))
    }

    pub fn move_step(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.steps.len() {
            return Err(AppError::UnknownStep { index: from });
        }
        if to >= self.steps.len() {
            return Err(AppError::UnknownStep { index: to });
        }
        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        Ok(())
    }

    /// Renders the workflow as one prompt; empty parts are left out.
    pub fn compose(&self) -> String {
        let mut lines = Vec::new();
        let role = self.role.trim();
        if !role.is_empty() {
            lines.push(format!("Ты — {}.", role.trim_end_matches('.')));
        }
        let goal = self.goal.trim();
        if !goal.is_empty() {
            lines.push(format!("Цель: {}.", goal.trim_end_matches('.')));
        }
        for (i, step) in self.steps.iter().enumerate() {
            let instruction = step.instruction.trim();
            if instruction.is_empty() {
                lines.push(format!("Шаг {}: {}.", i + 1, step.title.trim()));
            } else {
                lines.push(format!("Шаг {}: {}. {}", i + 1, step.title.trim(), instruction));
            }
        }
        if !self.constraints.trim().is_empty() {
            lines.push(format!("Ограничения: {}", self.constraints.trim()));
        }
        if !self.quality_check.trim().is_empty() {
            lines.push(format!("Перед отправкой проверь: {}", self.quality_check.trim()));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatBackend for Recorder {
        async fn complete(&self, request: ChatRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request);
            Ok("готово".to_string())
        }
    }

    #[test]
    fn test_parse_lab_names() {
        assert_eq!(LabKind::parse("iteration").unwrap(), LabKind::Iteration);
        assert_eq!(LabKind::parse("context_rescue").unwrap(), LabKind::ContextRescue);
        assert_eq!(LabKind::parse("context-rescue").unwrap(), LabKind::ContextRescue);
        assert!(matches!(LabKind::parse("quiz"), Err(AppError::UnknownLab(_))));
    }

    #[test]
    fn test_iteration_rounds_grow() {
        let sizes: Vec<usize> = LabKind::Iteration
            .spec()
            .rounds
            .iter()
            .map(|r| r.relevant.len())
            .collect();
        assert_eq!(sizes, vec![2, 3, 5]);
    }

    #[test]
    fn test_badges() {
        assert_eq!(Badge::for_score(2, 2), Badge::Green);
        assert_eq!(Badge::for_score(1, 2), Badge::Yellow);
        assert_eq!(Badge::for_score(2, 5), Badge::Red);
        assert_eq!(Badge::for_score(3, 5), Badge::Yellow);
        assert_eq!(Badge::for_score(0, 3), Badge::Red);
    }

    #[test]
    fn test_project_filters_to_relevant() {
        let result = validate("Ты — аналитик. Шаг 1: прочитай отзывы.");
        let view = project(&result, &[ElementKey::Role, ElementKey::Goal]);
        assert_eq!(view.max, 2);
        assert_eq!(view.score, 1);
        assert_eq!(view.badge, Badge::Yellow);
        assert_eq!(view.checklist[0].key, ElementKey::Role);
        assert!(view.checklist[0].present);
        assert!(!view.checklist[1].present);
        // suggestions come straight from the validator
        assert_eq!(view.suggestions, result.suggestions);
    }

    #[test]
    fn test_project_keeps_element_order() {
        let result = validate("");
        let view = project(&result, &[ElementKey::QualityBar, ElementKey::Role]);
        let keys: Vec<ElementKey> = view.checklist.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![ElementKey::Role, ElementKey::QualityBar]);
        assert_eq!(view.badge, Badge::Red);
    }

    #[test]
    fn test_session_flow() {
        let mut session = LabSession::new(LabKind::Iteration);
        assert!(session.submit("Ты — аналитик", String::new()).is_err());

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Drafting(0));
        assert!(session.advance().is_err());

        let outcome = session
            .submit("Ты — аналитик. Цель: найти жалобы.", "ok".into())
            .unwrap();
        assert!(outcome.view.passed());
        assert_eq!(session.state(), SessionState::Reviewed(0));

        assert_eq!(session.advance().unwrap(), SessionState::Drafting(1));
        session.submit("Шаг 1: прочитай", "ok".into()).unwrap();
        assert_eq!(session.advance().unwrap(), SessionState::Drafting(2));
        session.submit("Ты — аналитик", "ok".into()).unwrap();
        assert_eq!(session.advance().unwrap(), SessionState::Finished);
        assert!(session.current_round().is_none());
        assert!(session.start().is_err());
        assert_eq!(session.score_history(), vec![2, 1, 1]);
    }

    #[test]
    fn test_resubmit_overwrites_round() {
        let mut session = LabSession::new(LabKind::Iteration);
        session.start().unwrap();
        session.submit("Шаг 1: прочитай", "первый".into()).unwrap();
        session
            .submit("Ты — аналитик. Цель: найти жалобы.", "второй".into())
            .unwrap();

        let data = session.round_data(0).unwrap();
        assert_eq!(data.ai_response, "второй");
        assert_eq!(data.framework_elements, vec![ElementKey::Role, ElementKey::Goal]);
        assert_eq!(data.quality_score, 2);
        assert_eq!(session.score_history(), vec![2]);
    }

    #[test]
    fn test_empty_submission_rejected() {
        let mut session = LabSession::new(LabKind::Workflow);
        session.start().unwrap();
        assert!(matches!(
            session.submit("  ", String::new()),
            Err(AppError::EmptyPrompt)
        ));
        assert_eq!(session.state(), SessionState::Drafting(0));
    }

    #[tokio::test]
    async fn test_evaluate_uses_lab_system_prompt() {
        let chat = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let outcome = evaluate(LabKind::Iteration, 1, "Ты — аналитик. Шаг 1: прочитай.", &chat)
            .await
            .unwrap();
        assert_eq!(outcome.data.ai_response, "готово");
        assert_eq!(outcome.view.max, 3);
        assert_eq!(outcome.view.score, 2);

        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen[0].system.as_deref(), Some(ITERATION_COACH_PROMPT));
        assert_eq!(seen[0].prompt, "Ты — аналитик. Шаг 1: прочитай.");
    }

    #[tokio::test]
    async fn test_evaluate_wraps_rescue_summary() {
        let chat = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        evaluate(LabKind::ContextRescue, 0, "Ты — маркетолог.", &chat)
            .await
            .unwrap();
        let seen = chat.seen.lock().unwrap();
        assert!(seen[0].prompt.starts_with("Продолжаем работу"));
        assert!(seen[0].prompt.contains("Ты — маркетолог."));
    }

    #[tokio::test]
    async fn test_evaluate_rejects_bad_round() {
        let chat = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let err = evaluate(LabKind::Workflow, 3, "Ты — аналитик", &chat)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RoundOutOfRange { round: 3, rounds: 1 }));
        assert!(chat.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rescue_summary_check() {
        let report = check_summary(
            "Ты — маркетолог. Пишем постоянным клиентам, цель — продать подарочные наборы. \
             Промокод ЧАЙ2025 на 15%. Не более 120 слов.",
        );
        assert_eq!(report.lost, vec!["Без эмодзи в теме"]);
        assert!(!report.complete());
        assert!(report.validation.has(ElementKey::Role));
        assert!(report.validation.has(ElementKey::Constraints));

        let report = check_summary("");
        assert_eq!(report.lost.len(), KEY_FACTS.len());
    }

    #[test]
    fn test_workflow_compose_is_validated() {
        let mut builder = WorkflowBuilder::new("редактор блога", "подготовить пост");
        builder.add_step("Собери факты", "выпиши пять тезисов");
        builder.add_step("Напиши черновик", "");
        builder.constraints = "не более 300 слов".into();
        builder.quality_check = "все тезисы на месте".into();

        let prompt = builder.compose();
        assert_eq!(
            prompt,
            "Ты — редактор блога.\nЦель: подготовить пост.\n\
             Шаг 1: Собери факты. выпиши пять тезисов\nШаг 2: Напиши черновик.\n\
             Ограничения: не более 300 слов\nПеред отправкой проверь: все тезисы на месте"
        );
        assert!(validate(&prompt).is_complete);
    }

    #[test]
    fn test_workflow_reordering() {
        let mut builder = WorkflowBuilder::default();
        builder.add_step("A", "");
        builder.add_step("B", "");
        builder.add_step("C", "");
        builder.move_step(2, 0).unwrap();
        let titles: Vec<&str> = builder.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);

        assert_eq!(builder.remove_step(1).unwrap().title, "A");
        assert!(matches!(
            builder.remove_step(5),
            Err(AppError::UnknownStep { index: 5 })
        ));
        assert!(builder.move_step(0, 2).is_err());
        assert_eq!(builder.compose(), "Шаг 1: C.\nШаг 2: B.");
    }
}

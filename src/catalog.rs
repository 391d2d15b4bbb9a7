//! Course catalog: modules, sections and quizzes.
//!
//! The whole course is compiled in; nothing here changes at runtime.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::labs::LabKind;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub sections: &'static [Section],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub minutes: u32,
    pub body: &'static [&'static str],
    pub quiz: Option<Quiz>,
    pub lab: Option<LabKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub question: &'static str,
    pub options: &'static [&'static str],
    #[serde(skip)]
    pub correct: usize,
    #[serde(skip)]
    pub explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub section_id: String,
    pub answer: usize,
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: String,
}

/// Lightweight view of a module for navigation menus.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub section_ids: Vec<&'static str>,
    pub minutes: u32,
}

impl Module {
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id,
            title: self.title,
            icon: self.icon,
            description: self.description,
            section_ids: self.sections.iter().map(|s| s.id).collect(),
            minutes: self.sections.iter().map(|s| s.minutes).sum(),
        }
    }
}

static MODULES: &[Module] = &[
    Module {
        id: "foundations",
        title: "Как думает модель",
        icon: "🧠",
        description: "Токены, контекстное окно и почему формулировка решает всё",
        sections: &[
            Section {
                id: "what-is-llm",
                title: "Что такое языковая модель",
                summary: "Модель продолжает текст, а не ищет ответ в базе",
                minutes: 5,
                body: &[
                    "Языковая модель предсказывает следующий фрагмент текста по всему, что видит в запросе.",
                    "Она не знает, чего вы хотите, пока вы это не написали. Всё, что не сказано, модель додумает сама.",
                ],
                quiz: Some(Quiz {
                    question: "Откуда модель берёт ответ на ваш запрос?",
                    options: &[
                        "Ищет готовый ответ в интернете",
                        "Продолжает текст, опираясь на запрос и обучение",
                        "Спрашивает у оператора",
                    ],
                    correct: 1,
                    explanation: "Модель генерирует продолжение текста; качество запроса напрямую влияет на результат.",
                }),
                lab: None,
            },
            Section {
                id: "tokens-and-context",
                title: "Токены и контекстное окно",
                summary: "Сколько модель помнит и что происходит при переполнении",
                minutes: 7,
                body: &[
                    "Текст режется на токены. У каждой модели есть предел токенов, которые она видит одновременно.",
                    "Когда диалог длиннее окна, начало разговора выпадает из внимания модели, и она забывает договорённости.",
                ],
                quiz: Some(Quiz {
                    question: "Что происходит с ранними сообщениями, когда диалог превышает контекстное окно?",
                    options: &[
                        "Модель сжимает их без потерь",
                        "Они перестают учитываться",
                        "Модель просит разрешения их удалить",
                    ],
                    correct: 1,
                    explanation: "Всё, что не помещается в окно, модель просто не видит.",
                }),
                lab: None,
            },
            Section {
                id: "context-rescue",
                title: "Спасение контекста",
                summary: "Как перенести длинный диалог в новый чат без потерь",
                minutes: 10,
                body: &[
                    "Вместо бесконечного диалога соберите краткое резюме: роль, цель, принятые решения и открытые вопросы.",
                    "Хорошее резюме позволяет начать новый чат так, будто старый никуда не делся.",
                ],
                quiz: None,
                lab: Some(LabKind::ContextRescue),
            },
        ],
    },
    Module {
        id: "framework",
        title: "Фреймворк промпта",
        icon: "🧩",
        description: "Пять элементов сильного запроса: роль, цель, шаги, ограничения и планка качества",
        sections: &[
            Section {
                id: "role-and-goal",
                title: "Роль и цель",
                summary: "Кем должна быть модель и какой результат нужен",
                minutes: 8,
                body: &[
                    "Роль задаёт точку зрения и словарь: «Ты — customer success менеджер».",
                    "Цель описывает результат: «Цель — выявить три главные темы жалоб».",
                ],
                quiz: Some(Quiz {
                    question: "Какая строка задаёт модели роль?",
                    options: &[
                        "Сделай отчёт",
                        "Ты — аналитик службы поддержки",
                        "Не более 200 слов",
                    ],
                    correct: 1,
                    explanation: "Роль отвечает на вопрос «кто отвечает», а не «что сделать».",
                }),
                lab: None,
            },
            Section {
                id: "steps-and-constraints",
                title: "Шаги и ограничения",
                summary: "Порядок работы и рамки ответа",
                minutes: 8,
                body: &[
                    "Шаги превращают расплывчатую задачу в план: «Шаг 1: прочитай отзывы. Шаг 2: сгруппируй их».",
                    "Ограничения задают объём и формат: «Не более 200 слов, списком».",
                ],
                quiz: Some(Quiz {
                    question: "Что из этого ограничение?",
                    options: &["Шаг 2: сгруппируй", "Цель: найти причины", "Максимум 5 пунктов"],
                    correct: 2,
                    explanation: "Ограничение сужает форму ответа: объём, формат, запреты.",
                }),
                lab: None,
            },
            Section {
                id: "quality-bar",
                title: "Планка качества",
                summary: "Пусть модель проверит себя до того, как ответит",
                minutes: 6,
                body: &[
                    "Попросите модель проверить ответ по критериям: «Перед отправкой убедись, что каждый вывод подкреплён цитатой».",
                ],
                quiz: Some(Quiz {
                    question: "Зачем нужна планка качества?",
                    options: &[
                        "Чтобы модель отвечала быстрее",
                        "Чтобы модель сверила ответ с критериями",
                        "Чтобы сократить промпт",
                    ],
                    correct: 1,
                    explanation: "Самопроверка ловит пропуски и ошибки до того, как их увидите вы.",
                }),
                lab: None,
            },
            Section {
                id: "iteration-challenge",
                title: "Челлендж итераций",
                summary: "Три раунда: каждый раз промпт должен стать полнее",
                minutes: 15,
                body: &[
                    "Начните с короткого запроса и дорабатывайте его раунд за раундом, добавляя элементы фреймворка.",
                ],
                quiz: None,
                lab: Some(LabKind::Iteration),
            },
        ],
    },
    Module {
        id: "workflows",
        title: "Рабочие процессы",
        icon: "⚙️",
        description: "Цепочки промптов для повторяющихся задач",
        sections: &[
            Section {
                id: "prompt-chains",
                title: "Цепочки промптов",
                summary: "Разбиваем большую задачу на последовательность запросов",
                minutes: 8,
                body: &[
                    "Сложную задачу проще решить цепочкой: результат одного шага становится входом следующего.",
                ],
                quiz: Some(Quiz {
                    question: "Когда стоит разбить задачу на цепочку?",
                    options: &[
                        "Когда задача состоит из нескольких разных этапов",
                        "Всегда, даже для одного вопроса",
                        "Только если модель ошиблась",
                    ],
                    correct: 0,
                    explanation: "Цепочка помогает, когда этапы требуют разного фокуса.",
                }),
                lab: None,
            },
            Section {
                id: "workflow-builder",
                title: "Конструктор процесса",
                summary: "Соберите собственный рабочий процесс из шагов",
                minutes: 15,
                body: &[
                    "Добавьте шаги, расставьте их по порядку и проверьте, что итоговый промпт содержит все элементы фреймворка.",
                ],
                quiz: None,
                lab: Some(LabKind::Workflow),
            },
        ],
    },
];

pub fn modules() -> &'static [Module] {
    MODULES
}

pub fn module(id: &str) -> Result<&'static Module> {
    MODULES
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::UnknownModule(id.to_string()))
}

pub fn section(id: &str) -> Result<(&'static Module, &'static Section)> {
    MODULES
        .iter()
        .flat_map(|m| m.sections.iter().map(move |s| (m, s)))
        .find(|(_, s)| s.id == id)
        .ok_or_else(|| AppError::UnknownSection(id.to_string()))
}

/// All sections in course order.
pub fn ordered_sections() -> impl Iterator<Item = &'static Section> {
    MODULES.iter().flat_map(|m| m.sections.iter())
}

pub fn total_sections() -> usize {
    ordered_sections().count()
}

fn position(id: &str) -> Result<usize> {
    ordered_sections()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::UnknownSection(id.to_string()))
}

pub fn next_section(id: &str) -> Result<Option<&'static Section>> {
    let index = position(id)?;
    Ok(ordered_sections().nth(index + 1))
}

pub fn previous_section(id: &str) -> Result<Option<&'static Section>> {
    let index = position(id)?;
    Ok(match index {
        0 => None,
        i => ordered_sections().nth(i - 1),
    })
}

pub fn check_quiz(section_id: &str, answer: usize) -> Result<QuizOutcome> {
    let (_, section) = section(section_id)?;
    let quiz = section
        .quiz
        .as_ref()
        .ok_or_else(|| AppError::NoQuiz(section_id.to_string()))?;

    if answer >= quiz.options.len() {
        return Err(AppError::InvalidAnswer {
            answer,
            options: quiz.options.len(),
        });
    }

    Ok(QuizOutcome {
        section_id: section.id.to_string(),
        answer,
        correct: answer == quiz.correct,
        correct_option: quiz.correct,
        explanation: quiz.explanation.to_string(),
    })
}

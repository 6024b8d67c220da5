//! Screen builders
//!
//! Pure functions turning flow state into what the bot sends: text or media
//! caption plus an inline keyboard. Nothing here touches the network.

use rand::Rng;
use rand::seq::SliceRandom;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use url::Url;
use crate::config::MediaConfig;
use crate::models::{Posture, Series};
use crate::state::{Question, QuizRound, QuizSummary};
use crate::utils::errors::Result;
use crate::utils::helpers::{escape_markdown, truncate_text};
use super::actions::CallbackAction;

/// Postures per page in the series list
pub const LIST_PAGE_SIZE: usize = 10;

/// Appended to a question caption after a wrong pick
pub const INCORRECT_NOTE: &str = "Выбрано неверно ❌ Попробуйте еще раз!";

const WRONG_MARK: &str = "❌";
const BUTTON_TEXT_LIMIT: usize = 60;

/// Media attached to a screen
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Photo(Url),
    Video(Url),
}

/// One outbound message
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub media: Option<Media>,
    pub keyboard: Option<InlineKeyboardMarkup>,
    pub parse_mode: Option<ParseMode>,
}

impl Screen {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
            keyboard: None,
            parse_mode: None,
        }
    }

    pub fn photo(url: &str, caption: impl Into<String>) -> Result<Self> {
        Ok(Self {
            media: Some(Media::Photo(Url::parse(url)?)),
            ..Self::text(caption)
        })
    }

    pub fn video(url: &str, caption: impl Into<String>) -> Result<Self> {
        Ok(Self {
            media: Some(Media::Video(Url::parse(url)?)),
            ..Self::text(caption)
        })
    }

    pub fn with_keyboard(mut self, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        self.keyboard = Some(InlineKeyboardMarkup::new(rows));
        self
    }

    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some(ParseMode::Markdown);
        self
    }
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

fn menu_row() -> Vec<InlineKeyboardButton> {
    vec![button("🏠 Меню", CallbackAction::Menu)]
}

fn relax_row() -> Vec<InlineKeyboardButton> {
    vec![button("🧘 Шавасана", CallbackAction::Relax)]
}

/// Cover image of a series, or of the mixed quiz
pub fn series_image(media: &MediaConfig, scope: Option<Series>) -> &str {
    match scope {
        Some(Series::Primary) => &media.primary_series_image,
        Some(Series::Intermediate) => &media.intermediate_series_image,
        Some(Series::Advanced) => &media.advanced_series_image,
        None => &media.mixed_series_image,
    }
}

pub fn main_menu() -> Screen {
    Screen::text("🙏 Добро пожаловать в бот для изучения асан Аштанга Йоги!\nВыберите режим:")
        .with_keyboard(vec![
            vec![button("🧘 Учить асаны", CallbackAction::Learn)],
            vec![button("💪 Проверить мастерство", CallbackAction::Test)],
            vec![button("☕️ Поддержать проект", CallbackAction::Donate)],
        ])
}

pub fn help() -> Screen {
    Screen::text(
        "🧘 AsanaBuddy\n\n\
         /start - Главное меню\n\
         /help - Эта подсказка\n\n\
         Учите асаны по порядку, листайте список серии или проверьте себя в тесте.",
    )
}

pub fn use_start_hint() -> Screen {
    Screen::text("Нажмите /start, чтобы открыть меню 🙏")
}

pub fn retry_later() -> Screen {
    Screen::text("⏳ Не удалось связаться с базой асан. Попробуйте еще раз.").with_keyboard(vec![menu_row()])
}

pub fn learn_series_picker() -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Series::ALL
        .iter()
        .map(|series| vec![button(series.title(), CallbackAction::SelectSeries(*series))])
        .collect();
    rows.push(vec![button("◀️ Назад", CallbackAction::Menu)]);
    Screen::text("🧘 Выберите серию для изучения:").with_keyboard(rows)
}

pub fn series_overview(media: &MediaConfig, series: Series) -> Result<Screen> {
    let caption = format!("{}. Хотите следовать по серии или выбрать асаны из списка?", series.title());
    Ok(Screen::photo(series_image(media, Some(series)), caption)?.with_keyboard(vec![
        vec![button("📖 Учить по порядку", CallbackAction::LearnInOrder(series))],
        vec![button("👀 Посмотреть асаны", CallbackAction::ViewList { series, offset: 0 })],
        vec![button("◀️ Назад", CallbackAction::Learn)],
    ]))
}

pub fn range_start_prompt(series: Series) -> Screen {
    Screen::text(format!(
        "С какой асаны начнём? Введите цифру (1-{}):",
        series.max_order()
    ))
    .with_keyboard(vec![menu_row()])
}

pub fn range_end_prompt(start: u32) -> Screen {
    Screen::text(format!("Начинаем с {}. Какой асаной закончим? Введите цифру", start))
        .with_keyboard(vec![menu_row()])
}

/// Study card with a `position / total` indicator
pub fn posture_card(posture: &Posture, index: usize, total: usize) -> Result<Screen> {
    let mut caption = format!("🧘 *{}*", escape_markdown(&posture.name));
    if let Some(transcription) = posture.transcription.as_deref().filter(|t| !t.is_empty()) {
        caption.push_str(&format!("\n\n_{}_", escape_markdown(transcription)));
    }
    if let Some(meaning) = posture.meaning.as_deref().filter(|m| !m.is_empty()) {
        caption.push_str(&format!("\n\n{}", escape_markdown(meaning)));
    }

    Ok(Screen::photo(&posture.image_url, caption)?
        .markdown()
        .with_keyboard(vec![
            vec![
                button("◀️", CallbackAction::NavPrev),
                button(format!("{}/{}", index + 1, total), CallbackAction::Noop),
                button("▶️", CallbackAction::NavNext),
            ],
            menu_row(),
        ]))
}

pub fn browse_completed() -> Screen {
    Screen::text("🎉 Все асаны изучены!").with_keyboard(vec![menu_row(), relax_row()])
}

pub fn test_series_picker() -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Series::ALL
        .iter()
        .map(|series| vec![button(series.title(), CallbackAction::PreTest(Some(*series)))])
        .collect();
    rows.push(vec![button("Микс", CallbackAction::PreTest(None))]);
    rows.push(vec![button("◀️ Назад", CallbackAction::Menu)]);
    Screen::text("💪 Выберите серию для теста:").with_keyboard(rows)
}

pub fn pre_test(media: &MediaConfig, scope: Option<Series>) -> Result<Screen> {
    Ok(Screen::photo(
        series_image(media, scope),
        "Крепкая мулабандха поможет вам ответить на следующие 10 вопросов 🦾",
    )?
    .with_keyboard(vec![
        vec![button("🚀 Вперед!", CallbackAction::StartTest(scope))],
        vec![button("◀️ Назад", CallbackAction::Test)],
    ]))
}

pub fn question(question: &Question) -> Result<Screen> {
    let caption = match question.round {
        QuizRound::Main => format!("Вопрос {}/{}\nКак называется эта асана?", question.number, question.total),
        QuizRound::Growth => "🌱 Точка роста! Вспомни название:".to_string(),
    };
    let rows = question
        .options
        .iter()
        .map(|option| {
            vec![button(
                truncate_text(&option.name, BUTTON_TEXT_LIMIT),
                CallbackAction::Answer { correct: question.posture.id, chosen: option.id },
            )]
        })
        .collect();
    Ok(Screen::photo(&question.posture.image_url, caption)?.with_keyboard(rows))
}

/// Caption replacing an answered question
pub fn correct_caption(posture: &Posture) -> String {
    format!("Верно! ✅\n\n{}", posture.name)
}

/// Caption after a wrong pick; `None` when the note is already there
pub fn incorrect_caption(current: &str) -> Option<String> {
    if current.contains(WRONG_MARK) {
        None
    } else {
        Some(format!("{}\n\n{}", current, INCORRECT_NOTE))
    }
}

pub fn growth_intro() -> Screen {
    Screen::text("🚀 Работаем над вашими точками роста:")
}

/// Pick the celebratory video for a perfect round
pub fn pick_celebration<'a, R: Rng + ?Sized>(media: &'a MediaConfig, rng: &mut R) -> Option<&'a str> {
    media.perfect_videos.choose(rng).map(String::as_str)
}

/// Screens closing a round
pub fn quiz_finished(summary: &QuizSummary, celebration: Option<&str>) -> Result<Vec<Screen>> {
    let retry = vec![button("🔄 Еще раз", CallbackAction::Test)];

    if summary.total == 0 {
        return Ok(vec![Screen::text("🙏 В этой серии пока нет асан для теста.")
            .with_keyboard(vec![retry, menu_row()])]);
    }

    let mut screens = Vec::new();
    let rows = if summary.is_perfect() {
        let caption = "🎉 Безупречно! Теперь вы еще на один шаг ближе к самадхи!";
        screens.push(match celebration {
            Some(video) => Screen::video(video, caption)?,
            None => Screen::text(caption),
        });
        vec![retry, menu_row(), relax_row()]
    } else {
        screens.push(Screen::text(format!(
            "🏁 Тест окончен!\n📊 Ваш счёт: {} из {}",
            summary.score, summary.total
        )));
        vec![
            vec![button("🌱 Точки роста", CallbackAction::Growth)],
            retry,
            menu_row(),
            relax_row(),
        ]
    };
    screens.push(Screen::text("Что делаем дальше?").with_keyboard(rows));
    Ok(screens)
}

/// One page of the series list
pub fn posture_list(series: Series, postures: &[Posture], offset: usize) -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = postures
        .iter()
        .skip(offset)
        .take(LIST_PAGE_SIZE)
        .map(|p| {
            vec![button(
                truncate_text(&format!("{}. {}", p.order_num, p.name), BUTTON_TEXT_LIMIT),
                CallbackAction::Info(p.id),
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if offset > 0 {
        let previous = offset.saturating_sub(LIST_PAGE_SIZE);
        nav.push(button("◀️", CallbackAction::ViewList { series, offset: previous }));
    }
    if offset + LIST_PAGE_SIZE < postures.len() {
        nav.push(button("▶️", CallbackAction::ViewList { series, offset: offset + LIST_PAGE_SIZE }));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(menu_row());

    Screen::text("📋 Список асан серии:").with_keyboard(rows)
}

pub fn posture_detail(posture: &Posture) -> Result<Screen> {
    Ok(Screen::photo(&posture.image_url, format!("🧘 {}", posture.name))?.with_keyboard(vec![vec![button(
        "◀️ К списку",
        CallbackAction::ViewList { series: posture.series, offset: 0 },
    )]]))
}

pub fn donate(media: &MediaConfig) -> Result<Screen> {
    let text = "Этот ботик был сделан из любви к Аштанге и комьюнити 🙏🏼\n\n\
        Знание названий асан не изменит вашу жизнь (тут уж придется самим стараться 💪🏽), \
        но поможет глубже понять практику и не растеряться, \
        когда учитель попросит еще раз повторить бхуджапидасану 👹\n\n\
        *Если этот ботик был полезным и вы хотите отблагодарить его создательницу - жмите на донат. \
        Ботик сможет стать лучше, как и вы 💙*\n\n\
        _Продолжайте практиковать! And all, как мы знаем, is coming 🙌🏽_";

    Ok(Screen::text(text).markdown().with_keyboard(vec![
        vec![InlineKeyboardButton::url("🔥 Добавить тапаса (CloudTips)", Url::parse(&media.donate_url)?)],
        vec![button("◀️ В меню", CallbackAction::Menu)],
    ]))
}

/// Random wish card for the closing screen
pub fn relax<R: Rng + ?Sized>(media: &MediaConfig, rng: &mut R) -> Result<Screen> {
    let number = rng.gen_range(1..=media.wishes_count.max(1));
    let url = format!("{}/{}.png", media.wishes_base_url.trim_end_matches('/'), number);
    Screen::photo(&url, "✨ Твое пожелание на сегодня. Намасте! 🙏")
}

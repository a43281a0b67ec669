/// Message presenter.
///
/// Shows the touched entity's message and its reveal word while an effect
/// session runs. In [`RevealMode::Typed`] the message appears one character
/// every [`TYPE_INTERVAL_MS`]; the word sits in the markup at zero opacity
/// until the last character is out, then shows [`REVEAL_DELAY_MS`] later.

use crate::effects::{EffectEvent, EffectTimer};
use crate::entities::{ColorTag, SpecialEntity};
use crate::timeline::{Timeline, TimerId};

pub const TYPE_INTERVAL_MS: u64 = 150;
pub const REVEAL_DELAY_MS: u64 = 200;
pub const WORD_FONT_PX: u32 = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    /// Message and word at once (dodge game).
    Immediate,
    /// Type the message out, then reveal the word (Snake).
    Typed,
}

#[derive(Debug)]
pub struct MessagePresenter {
    message: Vec<char>,
    word: String,
    color: ColorTag,
    shown: usize,
    /// The word's span has been written into the markup.
    word_present: bool,
    word_visible: bool,
    visible: bool,
    typing: Option<TimerId>,
    reveal: Option<TimerId>,
}

impl Default for MessagePresenter {
    fn default() -> Self {
        MessagePresenter {
            message: Vec::new(),
            word: String::new(),
            color: ColorTag::Red,
            shown: 0,
            word_present: false,
            word_visible: false,
            visible: false,
            typing: None,
            reveal: None,
        }
    }
}

impl MessagePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present<E: EffectTimer>(
        &mut self,
        entity: &SpecialEntity,
        mode: RevealMode,
        now: u64,
        timers: &mut Timeline<E>,
    ) {
        self.stop_timers(timers);
        self.message = entity.message.chars().collect();
        self.word = entity.reveal_word.to_string();
        self.color = entity.color;
        self.visible = true;
        match mode {
            RevealMode::Immediate => {
                self.shown = self.message.len();
                self.word_present = true;
                self.word_visible = true;
            }
            RevealMode::Typed => {
                self.shown = 0;
                self.word_present = false;
                self.word_visible = false;
                self.typing =
                    Some(timers.every(now, TYPE_INTERVAL_MS, EffectEvent::TypeNext.into()));
            }
        }
    }

    /// One typing step. After the last character the typing timer stops and
    /// the word reveal is scheduled.
    pub fn type_next<E: EffectTimer>(&mut self, now: u64, timers: &mut Timeline<E>) {
        if self.shown < self.message.len() {
            self.shown += 1;
            self.word_present = true;
        }
        if self.shown == self.message.len() {
            if let Some(id) = self.typing.take() {
                timers.cancel(id);
                self.reveal =
                    Some(timers.after(now, REVEAL_DELAY_MS, EffectEvent::RevealWord.into()));
            }
        }
    }

    pub fn reveal_word(&mut self) {
        self.reveal = None;
        self.shown = self.message.len();
        self.word_present = true;
        self.word_visible = true;
    }

    /// Hide the output and stop any typing still in progress.
    pub fn hide<E: EffectTimer>(&mut self, timers: &mut Timeline<E>) {
        self.stop_timers(timers);
        self.visible = false;
    }

    fn stop_timers<E: EffectTimer>(&mut self, timers: &mut Timeline<E>) {
        for id in [self.typing.take(), self.reveal.take()].into_iter().flatten() {
            timers.cancel(id);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The part of the message revealed so far.
    pub fn shown_text(&self) -> String {
        self.message[..self.shown].iter().collect()
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn color(&self) -> ColorTag {
        self.color
    }

    pub fn is_word_visible(&self) -> bool {
        self.word_visible
    }

    /// Rendered block as overlay markup: message, line break, styled word.
    /// Empty before the first typed character.
    pub fn markup(&self) -> String {
        if !self.word_present {
            return String::new();
        }
        let opacity = if self.word_visible { "" } else { " opacity: 0;" };
        format!(
            "{}<br><span class=\"{}\" style=\"font-size: {}px;{}\">{}</span>",
            self.shown_text(),
            self.color.class_name(),
            WORD_FONT_PX,
            opacity,
            self.word
        )
    }
}

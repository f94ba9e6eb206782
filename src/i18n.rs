//! UI string lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
    Ja,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PromptLibrary,
    Search,
    OriginalRepo,
    NoMatches,
    Settings,
    Help,
    Message,
}

impl Locale {
    /// Parse a locale code such as `en`, `zh-CN` or `ja_JP`. Anything
    /// unknown falls back to English.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_lowercase().replace('_', "-");
        match code.as_str() {
            "zh" | "zh-cn" | "zh-hans" => Locale::ZhCn,
            c if c == "ja" || c.starts_with("ja-") => Locale::Ja,
            _ => Locale::En,
        }
    }

    pub fn t(self, key: Key) -> &'static str {
        match self {
            Locale::En => english(key),
            Locale::ZhCn => match key {
                Key::PromptLibrary => "提示库",
                Key::Search => "搜索",
                Key::OriginalRepo => "原始仓库",
                Key::NoMatches => "没有匹配的提示",
                Key::Settings => "设置",
                Key::Help => "帮助",
                Key::Message => "消息",
            },
            Locale::Ja => match key {
                Key::PromptLibrary => "プロンプトライブラリ",
                Key::Search => "検索",
                Key::OriginalRepo => "オリジナルリポジトリ",
                Key::NoMatches => "一致するプロンプトはありません",
                Key::Settings => "設定",
                // no translation yet
                Key::Help | Key::Message => english(key),
            },
        }
    }
}

fn english(key: Key) -> &'static str {
    match key {
        Key::PromptLibrary => "Prompt Library",
        Key::Search => "Search",
        Key::OriginalRepo => "Original Repository",
        Key::NoMatches => "No matching prompts",
        Key::Settings => "Settings",
        Key::Help => "Help",
        Key::Message => "Message",
    }
}

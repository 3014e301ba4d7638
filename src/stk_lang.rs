// Multi-language support module
// Provides localized UI strings for English and Chinese

#[derive(Clone)]
pub struct Assets {
    // Status bar
    pub status_score: &'static str, // "Score"
    pub status_mines: &'static str, // "Mines"

    // Control row
    pub prompt_mines: &'static str, // "How many mines?"
    pub btn_start: &'static str,

    // Key labels
    pub key_cashout: &'static str, // "Cash Out"
    pub key_exit: &'static str,    // "Exit"

    // Cash-out modal
    pub cashout_title: &'static str,
    pub cashout_score_fmt: &'static str, // "Final score: {}"

    // Loss banner
    pub loss_title: &'static str,
    pub loss_message: &'static str,

    // Buttons
    pub btn_close: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str,
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        status_score: "Score",
        status_mines: "Mines",

        prompt_mines: "How many mines?",
        btn_start: " Start ",

        key_cashout: "Cash Out",
        key_exit: "Exit",

        cashout_title: "Cashed Out",
        cashout_score_fmt: "Final score: {}",

        loss_title: "Boom",
        loss_message: "You hit a mine! Game over.",

        btn_close: " CLOSE ",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        status_score: "得分",
        status_mines: "地雷",

        prompt_mines: "放几颗雷？",
        btn_start: " 开始 ",

        key_cashout: "兑现",
        key_exit: "退出",

        cashout_title: "已兑现",
        cashout_score_fmt: "最终得分：{}",

        loss_title: "爆炸",
        loss_message: "你踩到地雷了！本局结束。",

        btn_close: " 关闭 ",

        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let normalized = lang_code.to_lowercase();
        let code = if normalized.starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }
}

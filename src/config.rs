//! Configuration: prompt templates (overridable from TOML) and env settings.
//!
//! See `WorksheetConfig` and `Prompts` for the TOML schema, `Settings` for env.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorksheetConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates rendered with `fill_template`.
///
/// Placeholders:
/// - worksheet: grade, subject, theme, notes, formats, difficulty, count
/// - regenerate: grade, subject, theme, notes, formats, difficulty,
///   current_question, problem_number
/// - title: grade, subject, theme
///
/// Any subset can be overridden in TOML; missing keys keep the defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub worksheet_template: String,
  pub regenerate_template: String,
  pub title_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      worksheet_template: WORKSHEET_TEMPLATE.into(),
      regenerate_template: REGENERATE_TEMPLATE.into(),
      title_template: TITLE_TEMPLATE.into(),
    }
  }
}

const WORKSHEET_TEMPLATE: &str = r#"あなたは日本の学校教育に精通したベテラン教師です。
以下の条件で、ワークシート用の問題を生成してください。

対象学年：{grade}
教科：{subject}
テーマ・単元：{theme}
補足情報：{notes}
問題形式：{formats}
難易度：{difficulty}
問題数：{count}

出力形式：以下のJSON形式のみで返してください。余分なテキストやマークダウン記法は一切含めないでください。
{
  "title": "ワークシートのタイトル案",
  "problems": [
    {
      "number": 1,
      "type": "問題形式（一問一答/穴埋め問題/選択問題/○×クイズ/記述式（短答）/記述式（長文）/並べ替え問題/マッチング）",
      "question": "問題文",
      "choices": ["選択肢A", "選択肢B", "選択肢C", "選択肢D"],
      "answer": "正解",
      "explanation": "解説（教師用）"
    }
  ]
}

注意点：
- 学年に適した語彙と表現を使うこと
- 問題文は明確で誤解のないようにすること
- 難易度に応じて思考の深さを調整すること
- 選択問題の場合、紛らわしい選択肢を含めること（選択肢は必ず4つ）
- ○×クイズの場合、choicesは["○", "×"]とすること
- 一問一答・記述式・穴埋めの場合は choices を空配列 [] とすること
- 並べ替え問題の場合、choicesに並べ替え対象の要素を入れ、answerに正しい順序を記述すること
- マッチング問題の場合、choicesに対応させるペアを入れること
- 日本の学習指導要領に沿った内容であること
- 必ず{count}問生成すること"#;

const REGENERATE_TEMPLATE: &str = r#"あなたは日本の学校教育に精通したベテラン教師です。
以下の条件で、ワークシート用の問題を1問だけ新しく生成してください。

対象学年：{grade}
教科：{subject}
テーマ・単元：{theme}
補足情報：{notes}
問題形式：{formats}
難易度：{difficulty}

現在の問題「{current_question}」とは異なる、新しい問題を作ってください。

出力形式：以下のJSON形式のみで返してください。余分なテキストやマークダウン記法は一切含めないでください。
{
  "number": {problem_number},
  "type": "問題形式",
  "question": "問題文",
  "choices": ["選択肢A", "選択肢B", "選択肢C", "選択肢D"],
  "answer": "正解",
  "explanation": "解説（教師用）"
}

注意点：
- 学年に適した語彙と表現を使うこと
- 問題文は明確で誤解のないようにすること
- 選択問題の場合、選択肢は4つで紛らわしい選択肢を含めること
- ○×クイズの場合、choicesは["○", "×"]とすること
- 一問一答・記述式・穴埋めの場合は choices を空配列 [] とすること
- 日本の学習指導要領に沿った内容であること"#;

const TITLE_TEMPLATE: &str = r#"以下の条件で、小中学生向けのワークシートのタイトルを3つ提案してください。

対象学年：{grade}
教科：{subject}
テーマ・単元：{theme}

出力形式：以下のJSON形式のみで返してください。余分なテキストやマークダウン記法は一切含めないでください。
{
  "titles": ["タイトル案1", "タイトル案2", "タイトル案3"]
}

タイトルは子どもが親しみやすく、学習意欲が湧くような表現にしてください。"#;

/// Attempt to load `WorksheetConfig` from WORKSHEET_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_worksheet_config_from_env() -> Option<WorksheetConfig> {
  let path = std::env::var("WORKSHEET_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<WorksheetConfig>(&s) {
      Ok(cfg) => {
        info!(target: "worksheet_backend", %path, "Loaded worksheet config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "worksheet_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "worksheet_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Process settings read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  /// Not validated locally; an empty key makes the upstream call fail instead.
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
  pub static_dir: String,
}

impl Settings {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build settings from any key lookup. Unparseable numbers fall back to defaults.
  pub fn from_lookup<F>(get: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let port = get("PORT")
      .and_then(|p| p.trim().parse::<u16>().ok())
      .unwrap_or(DEFAULT_PORT);
    let timeout_secs = get("GEMINI_TIMEOUT_SECS")
      .and_then(|s| s.trim().parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self {
      port,
      api_key: get("GEMINI_API_KEY").unwrap_or_default(),
      base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
      model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
      timeout: Duration::from_secs(timeout_secs),
      static_dir: get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
    }
  }
}

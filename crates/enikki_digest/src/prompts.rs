//! Instruction templates for the generative calls.

/// Output language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "日本語";

/// Character ceiling requested from the summary model.
pub const SUMMARY_CHAR_TARGET: usize = 1500;

/// Leading characters of the digest quoted in the image prompt request.
pub const IMAGE_PROMPT_EXCERPT_CHARS: usize = 1000;

/// First part of every image request.
pub const IMAGE_DIRECTIVE: &str = "Generate exactly one illustration. \
You must return an image; a text-only reply is not acceptable. \
Do not render any written text inside the image.";

/// Instruction asking for the weekly digest of `corpus`.
///
/// # Examples
///
/// ```
/// use enikki_digest::summary_prompt;
///
/// let prompt = summary_prompt("[2024/06/01 12:00:00] alice: hi", "English");
/// assert!(prompt.contains("alice: hi"));
/// assert!(prompt.ends_with("English で書いてください。"));
/// ```
pub fn summary_prompt(corpus: &str, language: &str) -> String {
    format!(
        "あなたはDiscordサーバーの週間レポートライターです。
以下はDiscordサーバーの過去1週間の会話ログです。
これを読んで、サーバーの1週間の出来事をまとめた「週間絵日記」のテキストを作成してください。

## ルール
- 各チャンネルの主要なトピックや盛り上がったポイントをまとめる
- 参加者の名前はそのまま使用する
- 楽しく読めるようなトーンで書く
- 絵文字を適度に使って読みやすくする
- 長すぎず、{SUMMARY_CHAR_TARGET}文字以内にまとめる
- Discordに投稿するので、Markdownの太字(**テキスト**)を使ってよい
- 重要な会話がなかったチャンネルは省略してよい

## 会話ログ
{corpus}

## 出力
上記の会話に基づいた週間まとめを {language} で書いてください。"
    )
}

/// Positional reference instructions for the attached images.
///
/// Image 1 is the style reference when present; characters follow in the
/// order given. Returns an empty string when there are no assets.
///
/// # Examples
///
/// ```
/// use enikki_digest::asset_instructions;
///
/// let text = asset_instructions(true, &["alice", "bob"]);
/// assert!(text.contains("match the style of reference image 1"));
/// assert!(text.contains("alice corresponds to reference image 2"));
/// assert!(text.contains("bob corresponds to reference image 3"));
///
/// assert!(asset_instructions(false, &[]).is_empty());
/// ```
pub fn asset_instructions(has_style: bool, characters: &[&str]) -> String {
    let mut lines = Vec::new();
    if has_style {
        lines.push("- Draw the illustration to match the style of reference image 1.".to_string());
    }

    let offset = usize::from(has_style) + 1;
    for (index, name) in characters.iter().enumerate() {
        lines.push(format!(
            "- The character {} corresponds to reference image {}; keep their appearance.",
            name,
            index + offset
        ));
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("\n## Reference images\n{}\n", lines.join("\n"))
    }
}

/// Instruction asking the text model for one image prompt derived from
/// `summary`, with asset instructions appended.
pub fn image_prompt_request(summary: &str, asset_instructions: &str) -> String {
    let excerpt: String = summary.chars().take(IMAGE_PROMPT_EXCERPT_CHARS).collect();
    format!(
        "You are an illustrator planning a single \"weekly picture diary\" illustration \
for a Discord server.
Read the weekly digest below and write ONE image generation prompt, in English, \
that depicts a scene symbolising the server's week.

## Style
- Cute, pop illustration
- Bright, cheerful atmosphere
- One scene that captures the week's activity
- No written text inside the image

## Weekly digest
{excerpt}
{asset_instructions}
Reply with the prompt only, without any preamble."
    )
}

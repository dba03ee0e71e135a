//! gfy（アップロード済み動画）のメタデータ
//!
//! `GET /v1/gfycats/{id}` の `gfyItem` をそのまま写し取った値オブジェクト。
//! Gfycat は同じ項目を数値で返したり文字列で返したりするため、
//! 数値・真偽値の項目は寛容にデシリアライズする。

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// gfy のメタデータ
///
/// 提供側が省略しうる項目はすべて `Option`。構築後は変更しない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GfyMetadata {
    #[serde(default)]
    pub gfy_id: String,
    #[serde(default)]
    pub gfy_name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub gfy_number: Option<u64>,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub user_name: Option<String>,

    /// 公開ページのURL
    #[serde(default)]
    pub url: Option<String>,

    // レンディション
    #[serde(default)]
    pub mp4_url: Option<String>,
    #[serde(default)]
    pub webm_url: Option<String>,
    #[serde(default)]
    pub webp_url: Option<String>,
    #[serde(default)]
    pub gif_url: Option<String>,
    #[serde(default)]
    pub mobile_url: Option<String>,
    #[serde(default)]
    pub mobile_poster_url: Option<String>,
    #[serde(default)]
    pub mini_url: Option<String>,
    #[serde(default)]
    pub mini_poster_url: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub thumb100_poster_url: Option<String>,
    #[serde(default)]
    pub max5mb_gif: Option<String>,
    #[serde(default)]
    pub max2mb_gif: Option<String>,
    #[serde(default)]
    pub max1mb_gif: Option<String>,
    #[serde(default)]
    pub gif100px: Option<String>,

    // 映像情報
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default)]
    pub avg_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frame_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub num_frames: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub mp4_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub webm_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub gif_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_audio: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_transparency: Option<bool>,
    #[serde(default)]
    pub md5: Option<String>,

    /// 作成日時（Unix秒）
    #[serde(default, deserialize_with = "lenient_i64")]
    pub create_date: Option<i64>,

    // 反応
    #[serde(default, deserialize_with = "lenient_u64")]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub dislikes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub views: Option<u64>,

    /// "0" のときだけ false、それ以外の値は true
    #[serde(default, deserialize_with = "nsfw_flag")]
    pub nsfw: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub published: Option<bool>,

    // 投稿元
    #[serde(default, deserialize_with = "lenient_u64")]
    pub source: Option<u64>,
    #[serde(default)]
    pub reddit_id: Option<String>,
    #[serde(default)]
    pub reddit_id_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain_whitelist: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub geo_whitelist: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language_categories: Vec<String>,
}

impl GfyMetadata {
    /// 作成日時を UTC の日時として返す
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_date
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

/// メタデータ取得の結果
///
/// 存在しない id に対しては `Invalid` を返し、エラーにはしない。
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataLookup {
    Valid(Box<GfyMetadata>),
    Invalid,
}

impl MetadataLookup {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn metadata(&self) -> Option<&GfyMetadata> {
        match self {
            Self::Valid(metadata) => Some(metadata),
            Self::Invalid => None,
        }
    }

    pub fn into_metadata(self) -> Option<GfyMetadata> {
        match self {
            Self::Valid(metadata) => Some(*metadata),
            Self::Invalid => None,
        }
    }
}

impl From<GfyMetadata> for MetadataLookup {
    fn from(metadata: GfyMetadata) -> Self {
        Self::Valid(Box::new(metadata))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0),
        Some(Value::String(s)) => match s.trim() {
            "" => None,
            "0" | "false" => Some(false),
            _ => Some(true),
        },
        _ => None,
    })
}

fn nsfw_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => s != "0",
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Bool(b)) => b,
        Some(_) => true,
    })
}

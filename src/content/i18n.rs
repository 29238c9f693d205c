//! Interface language and the UI string table
//!
//! Strings are looked up by key. Arabic entries fall back to English, and a
//! key missing from both is returned as-is so the UI never shows a blank.

use std::fmt;
use std::str::FromStr;

use fxhash::FxHashMap as HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::storage::{load_json, save_json, KeyValueStore};
use crate::core::constants::LANG_STORAGE_KEY;
use crate::{MapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    pub fn dir(&self) -> TextDirection {
        match self {
            Lang::En => TextDirection::Ltr,
            Lang::Ar => TextDirection::Rtl,
        }
    }

    /// The saved interface language, English if none was saved
    pub fn load(store: &dyn KeyValueStore) -> Lang {
        load_json(store, LANG_STORAGE_KEY, Lang::En)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_json(store, LANG_STORAGE_KEY, self)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ar" => Ok(Lang::Ar),
            other => Err(MapError::Config(format!("unsupported language: {}", other))),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("Home", "Home"),
    ("Gangs", "Gangs"),
    ("Threads", "Threads"),
    ("Images", "Images"),
    ("Links", "Links"),
    ("Characters", "Characters"),
    ("Credits", "Credits"),
    ("mtnewsCardTitle", "MTNEWS Card"),
    ("cardInfoTitle", "Card Informations"),
    ("cardInfoDescription", "MTNEWS Sharing all news about MTRP Server"),
    ("followers", "Followers"),
    ("teamWorkers", "Team Workers"),
    ("goal", "MTNEWS Goal"),
    ("donatePrompt", "If You Hope To Donate Me 🧡."),
    ("donateButton", "Donate"),
    ("gangsWip", "This section is under development."),
    ("searchMapPlaceholder", "Search for a location..."),
    ("mapObjects", "Map Objects"),
    ("disableAll", "Disable All"),
    ("locationNotFound", "Location not found"),
    ("searchPlaceholder", "Search by title or owner..."),
    ("sortBy", "Sort By"),
    ("sortByName", "Owner Name"),
    ("sortByDate", "Date"),
    ("sortBySections", "Sections Count"),
    ("return", "Return"),
    ("threadCharacters", "Characters"),
    ("threadSocialMedia", "Social Media"),
    ("thanks", "Thanks for Visiting Us 🧡."),
    ("sectionNumbers", "Section Numbers"),
    ("owner", "Owner"),
    ("searchImagesPlaceholder", "Search by character..."),
    ("linkButton", "Link"),
    ("mtrpOn", "MTRP on"),
    ("founder", "Founder"),
    ("developer", "Developer"),
    ("creditsFor", "Credits For"),
    ("contributor", "Contributor"),
    ("copied", "Copied!"),
    ("loading", "Loading..."),
];

const AR: &[(&str, &str)] = &[
    ("Home", "الرئيسية"),
    ("Gangs", "العصابات"),
    ("Threads", "المواضيع"),
    ("Images", "الصور"),
    ("Links", "الروابط"),
    ("Characters", "الشخصيات"),
    ("Credits", "الشكر"),
    ("mtnewsCardTitle", "بطاقة MTNEWS"),
    ("cardInfoTitle", "معلومات البطاقة"),
    ("cardInfoDescription", "MTNEWS لمشاركة جميع أخبار سيرفر MTRP"),
    ("followers", "متابع"),
    ("teamWorkers", "أعضاء الفريق"),
    ("goal", "هدف MTNEWS"),
    ("donateButton", "تبرع"),
    ("gangsWip", "هذا القسم قيد التطوير."),
    ("searchMapPlaceholder", "ابحث عن موقع..."),
    ("mapObjects", "عناصر الخريطة"),
    ("disableAll", "تعطيل الكل"),
    ("locationNotFound", "الموقع غير موجود"),
    ("searchPlaceholder", "ابحث بالعنوان أو المالك..."),
    ("sortBy", "ترتيب حسب"),
    ("sortByName", "اسم المالك"),
    ("sortByDate", "التاريخ"),
    ("sortBySections", "عدد الأقسام"),
    ("return", "العودة"),
    ("threadCharacters", "الشخصيات"),
    ("threadSocialMedia", "وسائل التواصل الاجتماعي"),
    ("thanks", "شكراً لزيارتنا 🧡."),
    ("sectionNumbers", "أرقام الأقسام"),
    ("owner", "المالك"),
    ("searchImagesPlaceholder", "ابحث بالشخصية..."),
    ("linkButton", "رابط"),
    ("mtrpOn", "MTRP على"),
    ("founder", "المؤسس"),
    ("developer", "المطور"),
    ("creditsFor", "شكر خاص لـ"),
    ("contributor", "مساهم"),
    ("copied", "تم النسخ!"),
    ("loading", "جاري التحميل..."),
];

static TABLES: Lazy<[HashMap<&'static str, &'static str>; 2]> =
    Lazy::new(|| [EN.iter().copied().collect(), AR.iter().copied().collect()]);

fn table(lang: Lang) -> &'static HashMap<&'static str, &'static str> {
    match lang {
        Lang::En => &TABLES[0],
        Lang::Ar => &TABLES[1],
    }
}

/// UI string for `key` in `lang`
pub fn translate<'a>(lang: Lang, key: &'a str) -> &'a str {
    table(lang)
        .get(key)
        .or_else(|| table(Lang::En).get(key))
        .copied()
        .unwrap_or(key)
}

//! Static brand catalog and the bundled store fixture.
//!
//! The brand catalog is a fixed mapping from lowercase brand ID to its
//! descriptive record. Store records normally come from the data backend;
//! [`sample_stores`] is the fixture served when no backend is configured.

use std::sync::LazyLock;

use crate::types::{Brand, BrandId, Store, StoreId};

struct BrandSeed {
    name: &'static str,
    name_ja: &'static str,
    image: &'static str,
    description: &'static str,
    long_description: &'static str,
    established: &'static str,
    origin: &'static str,
    category: &'static str,
}

const SKATE_STREETWEAR: &str = "Skateboard / Streetwear";

const BRAND_SEEDS: &[BrandSeed] = &[
    BrandSeed {
        name: "BUTTER",
        name_ja: "バター",
        image: "/static/brands/butter.jpg",
        description: "NYC発のスケートブランド",
        long_description: "BUTTER GOODSは、ニューヨーク発のスケートブランド。ストリートカルチャーとスケートボードの融合から生まれた独自のスタイルが特徴です。",
        established: "1994",
        origin: "New York, USA",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "DIME",
        name_ja: "ダイム",
        image: "/static/brands/dime.jpg",
        description: "カナダ・モントリオール発",
        long_description: "DIMEは、カナダ・モントリオール発のスケートブランド。ユニークなデザインとユーモアのあるアプローチで知られています。",
        established: "2005",
        origin: "Montreal, Canada",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "EVISEN",
        name_ja: "エビセン",
        image: "/static/brands/evisen.jpg",
        description: "日本発スケートブランド",
        long_description: "EVISENは、日本発のスケートブランド。日本のストリートカルチャーとスケートボードシーンを代表するブランドの一つです。",
        established: "2011",
        origin: "Tokyo, Japan",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "FTC",
        name_ja: "エフティーシー",
        image: "/static/brands/ftc_3.jpg",
        description: "サンフランシスコの老舗",
        long_description: "FTC（For The City）は、サンフランシスコを拠点とする老舗スケートショップ＆ブランド。西海岸スケートカルチャーの中心的存在です。",
        established: "1986",
        origin: "San Francisco, USA",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "OBEY",
        name_ja: "オベイ",
        image: "/static/brands/obey.jpg",
        description: "ストリートアートブランド",
        long_description: "OBEYは、ストリートアーティストShepard Faireyによって設立されたブランド。アートとストリートカルチャーを融合させたユニークなデザインが特徴です。",
        established: "2001",
        origin: "Los Angeles, USA",
        category: "Streetwear / Art",
    },
    BrandSeed {
        name: "POLAR",
        name_ja: "ポーラー",
        image: "/static/brands/polar.jpg",
        description: "スウェーデン発",
        long_description: "POLAR SKATE CO.は、スウェーデン発のスケートブランド。北欧らしいミニマルなデザインと高品質な製品で知られています。",
        established: "2011",
        origin: "Malmö, Sweden",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "SNACKS",
        name_ja: "スナックス",
        image: "/static/brands/snacks.jpg",
        description: "NY発スケートブランド",
        long_description: "SNACKSは、ニューヨーク発のスケートブランド。遊び心のあるデザインとストリート感覚が魅力です。",
        established: "2015",
        origin: "New York, USA",
        category: SKATE_STREETWEAR,
    },
    BrandSeed {
        name: "YARDSALE",
        name_ja: "ヤードセール",
        image: "/static/brands/yardsale.jpg",
        description: "ロンドン発",
        long_description: "YARDSALEは、ロンドン発のスケートブランド。イギリスのストリートカルチャーを体現したユニークなスタイルが特徴です。",
        established: "2013",
        origin: "London, UK",
        category: SKATE_STREETWEAR,
    },
];

static BRANDS: LazyLock<Vec<Brand>> = LazyLock::new(|| {
    BRAND_SEEDS
        .iter()
        .map(|seed| Brand {
            id: BrandId::new(seed.name.to_lowercase()),
            name: seed.name.to_owned(),
            name_ja: seed.name_ja.to_owned(),
            image: seed.image.to_owned(),
            description: seed.description.to_owned(),
            long_description: seed.long_description.to_owned(),
            established: seed.established.to_owned(),
            origin: seed.origin.to_owned(),
            category: seed.category.to_owned(),
        })
        .collect()
});

/// All catalog brands in catalog order.
#[must_use]
pub fn brands() -> &'static [Brand] {
    &BRANDS
}

/// Look up a brand by ID or display name, ignoring case.
///
/// Returns `None` for unknown or blank identifiers.
#[must_use]
pub fn find_brand(id: &str) -> Option<&'static Brand> {
    let id = BrandId::from_name(id).ok()?;
    BRANDS.iter().find(|brand| brand.id == id)
}

/// Distinct brand categories in catalog order.
#[must_use]
pub fn brand_categories() -> Vec<&'static str> {
    crate::listing::categories(brands())
}

/// A store brand reference that is not exactly a catalog brand name.
///
/// Brand membership filters compare names exactly, so a reference that only
/// differs in case still keeps the store off that brand's listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedBrand {
    pub store_id: StoreId,
    pub brand: String,
    /// Catalog name the reference matches ignoring case, if any.
    pub expected: Option<&'static str>,
}

impl std::fmt::Display for UnmatchedBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.expected {
            Some(expected) => write!(
                f,
                "store {} references brand {:?} (case mismatch, expected {expected:?})",
                self.store_id, self.brand
            ),
            None => write!(
                f,
                "store {} references unknown brand {:?}",
                self.store_id, self.brand
            ),
        }
    }
}

/// Find store brand references that are not exact catalog brand names.
///
/// Unmatched references are reported, never rejected.
#[must_use]
pub fn unmatched_brand_references(stores: &[Store]) -> Vec<UnmatchedBrand> {
    stores
        .iter()
        .flat_map(|store| {
            store
                .brands
                .iter()
                .filter(|brand| !BRANDS.iter().any(|known| known.name == **brand))
                .map(|brand| UnmatchedBrand {
                    store_id: store.id.clone(),
                    brand: brand.clone(),
                    expected: find_brand(brand).map(|known| known.name.as_str()),
                })
        })
        .collect()
}

struct StoreSeed {
    id: &'static str,
    name: &'static str,
    name_ja: &'static str,
    area: &'static str,
    prefecture: &'static str,
    city: &'static str,
    address: &'static str,
    brands: &'static [&'static str],
    description: &'static str,
    open_year: Option<i32>,
}

const STORE_SEEDS: &[StoreSeed] = &[
    StoreSeed {
        id: "instant",
        name: "INSTANT",
        name_ja: "インスタント",
        area: "関東",
        prefecture: "東京都",
        city: "渋谷区",
        address: "渋谷区神宮前6-12-5",
        brands: &["BUTTER", "DIME", "POLAR", "YARDSALE"],
        description: "原宿にある老舗スケートショップ。国内外の人気ブランドを幅広く取り扱う。",
        open_year: Some(2005),
    },
    StoreSeed {
        id: "ftc-tokyo",
        name: "FTC TOKYO",
        name_ja: "エフティーシー東京",
        area: "関東",
        prefecture: "東京都",
        city: "渋谷区",
        address: "渋谷区神宮前4-25-15",
        brands: &["FTC", "EVISEN", "BUTTER"],
        description: "サンフランシスコ発の老舗ブランドFTCの直営店。",
        open_year: Some(2010),
    },
    StoreSeed {
        id: "evisen-shop",
        name: "EVISEN SKATEBOARDS",
        name_ja: "エビセンスケートボード",
        area: "関東",
        prefecture: "東京都",
        city: "渋谷区",
        address: "渋谷区神宮前3-24-5",
        brands: &["EVISEN", "DIME", "POLAR"],
        description: "日本を代表するスケートブランドEVISENの直営店。",
        open_year: Some(2015),
    },
    StoreSeed {
        id: "spotaka",
        name: "SPOTAKA",
        name_ja: "スポタカ",
        area: "関東",
        prefecture: "東京都",
        city: "世田谷区",
        address: "世田谷区北沢2-30-3",
        brands: &["OBEY", "DIME", "SNACKS", "YARDSALE"],
        description: "下北沢のセレクトショップ。スケートとストリートカルチャーを発信。",
        open_year: Some(2008),
    },
    StoreSeed {
        id: "murasaki-shibuya",
        name: "murasaki sports SHIBUYA",
        name_ja: "ムラサキスポーツ渋谷",
        area: "関東",
        prefecture: "東京都",
        city: "渋谷区",
        address: "渋谷区神南1-20-5",
        brands: &["OBEY", "POLAR", "BUTTER"],
        description: "渋谷のスケート・スノーボード専門店。",
        open_year: Some(2000),
    },
    StoreSeed {
        id: "coverage",
        name: "COVERAGE",
        name_ja: "カバレッジ",
        area: "関西",
        prefecture: "大阪府",
        city: "大阪市",
        address: "大阪市中央区西心斎橋2-10-21",
        brands: &["DIME", "POLAR", "EVISEN", "YARDSALE"],
        description: "大阪アメ村のスケートショップ。関西のスケートシーンを牽引。",
        open_year: Some(2003),
    },
    StoreSeed {
        id: "hoop-osaka",
        name: "HOOP OSAKA",
        name_ja: "フープ大阪",
        area: "関西",
        prefecture: "大阪府",
        city: "大阪市",
        address: "大阪市中央区西心斎橋1-6-14",
        brands: &["BUTTER", "FTC", "SNACKS"],
        description: "アメリカ村のスケートボードショップ。",
        open_year: Some(2007),
    },
    StoreSeed {
        id: "reggie",
        name: "REGGIE",
        name_ja: "レジー",
        area: "中部",
        prefecture: "愛知県",
        city: "名古屋市",
        address: "名古屋市中区大須3-30-60",
        brands: &["EVISEN", "DIME", "POLAR", "BUTTER"],
        description: "名古屋大須のスケートショップ。東海エリアのスケーターの拠点。",
        open_year: Some(2012),
    },
];

/// The bundled store fixture, in fixture order.
#[must_use]
pub fn sample_stores() -> Vec<Store> {
    STORE_SEEDS
        .iter()
        .map(|seed| Store {
            id: StoreId::new(seed.id),
            name: seed.name.to_owned(),
            name_ja: seed.name_ja.to_owned(),
            area: seed.area.to_owned(),
            prefecture: seed.prefecture.to_owned(),
            city: seed.city.to_owned(),
            address: seed.address.to_owned(),
            brands: seed.brands.iter().map(|b| (*b).to_owned()).collect(),
            description: seed.description.to_owned(),
            open_year: seed.open_year,
        })
        .collect()
}

// storefront/src/db/seed.rs

//! Starter catalog for fresh databases. Rows that already exist are left alone.

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::errors::Result;

struct SeedCategory {
  id: &'static str,
  name: &'static str,
  description: &'static str,
  icon: &'static str,
  display_order: i32,
}

struct SeedProduct {
  id: &'static str,
  name: &'static str,
  category: &'static str,
  price: i64,
  original_price: Option<i64>,
  discount: Option<i32>,
  description: &'static str,
  features: &'static [&'static str],
  sizes: &'static [&'static str],
  colors: &'static [&'static str],
  stock: i32,
  badge: Option<&'static str>,
}

const CATEGORIES: &[SeedCategory] = &[
  SeedCategory {
    id: "spring-summer",
    name: "춘하복",
    description: "통기성과 쾌적함을 중시한 계절용 작업복",
    icon: "sun",
    display_order: 1,
  },
  SeedCategory {
    id: "fall-winter",
    name: "추동복",
    description: "보온성과 활동성을 겸비한 동계용 작업복",
    icon: "snowflake",
    display_order: 2,
  },
  SeedCategory {
    id: "safety-shoes",
    name: "안전화",
    description: "발을 보호하는 프리미엄 안전화 라인",
    icon: "footprints",
    display_order: 3,
  },
];

const PRODUCTS: &[SeedProduct] = &[
  SeedProduct {
    id: "shoe-steel-toe",
    name: "안전화 (Steel Toe)",
    category: "안전화",
    price: 65_000,
    original_price: None,
    discount: None,
    description: "강철 선심 보호",
    features: &["200J 충격 방어", "15kN 압박 방어", "KS 인증"],
    sizes: &["250", "260", "270", "280"],
    colors: &["블랙"],
    stock: 40,
    badge: Some("BEST"),
  },
  SeedProduct {
    id: "shoe-insulated",
    name: "절연 안전화",
    category: "안전화",
    price: 95_000,
    original_price: None,
    discount: None,
    description: "전기 작업 전용",
    features: &["18,000V 절연", "정전기 방지", "전기공사 필수"],
    sizes: &["250", "260", "270", "280"],
    colors: &["블랙", "그레이"],
    stock: 25,
    badge: None,
  },
  SeedProduct {
    id: "shoe-lightweight",
    name: "경량 안전화",
    category: "안전화",
    price: 59_000,
    original_price: Some(69_000),
    discount: Some(14),
    description: "실내 작업장 최적",
    features: &["경량 소재", "통기성 우수", "장시간 착용"],
    sizes: &["240", "250", "260", "270"],
    colors: &["네이비"],
    stock: 60,
    badge: Some("SALE"),
  },
  SeedProduct {
    id: "wear-summer-jacket",
    name: "하계 작업 점퍼",
    category: "춘하복",
    price: 48_000,
    original_price: None,
    discount: None,
    description: "흡습속건 원단의 경량 작업 점퍼",
    features: &["경량 소재", "흡습속건", "UV 차단"],
    sizes: &["M", "L", "XL"],
    colors: &["네이비", "그레이"],
    stock: 80,
    badge: Some("NEW"),
  },
  SeedProduct {
    id: "wear-winter-parka",
    name: "동계 방한 파카",
    category: "추동복",
    price: 89_000,
    original_price: None,
    discount: None,
    description: "보온 충전재와 방풍 기능을 갖춘 동계 작업복",
    features: &["보온 충전재", "방풍 기능", "신축성 원단"],
    sizes: &["M", "L", "XL", "2XL"],
    colors: &["블랙"],
    stock: 30,
    badge: None,
  },
];

fn owned(values: &[&str]) -> Vec<String> {
  values.iter().map(|v| v.to_string()).collect()
}

#[instrument(name = "db::seed_catalog", skip(pool), err(Display))]
pub async fn seed_catalog(pool: &PgPool) -> Result<()> {
  let mut inserted = 0u64;

  for category in CATEGORIES {
    inserted += sqlx::query(
      "INSERT INTO categories (id, name, description, icon, display_order) \
       VALUES ($1, $2, $3, $4, $5) ON CONFLICT DO NOTHING",
    )
    .bind(category.id)
    .bind(category.name)
    .bind(category.description)
    .bind(category.icon)
    .bind(category.display_order)
    .execute(pool)
    .await?
    .rows_affected();
  }

  for product in PRODUCTS {
    inserted += sqlx::query(
      "INSERT INTO products (id, name, category, price, original_price, discount, description, \
       features, sizes, colors, stock, badge) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) ON CONFLICT (id) DO NOTHING",
    )
    .bind(product.id)
    .bind(product.name)
    .bind(product.category)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.discount)
    .bind(product.description)
    .bind(owned(product.features))
    .bind(owned(product.sizes))
    .bind(owned(product.colors))
    .bind(product.stock)
    .bind(product.badge)
    .execute(pool)
    .await?
    .rows_affected();
  }

  info!(rows = inserted, "Starter catalog seeded.");
  Ok(())
}

// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scrape_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub base_url: String,
    pub processing_type: String,
    pub status: String,
    pub options: Json,
    pub custom_headers: Option<Json>,
    pub url_count: i32,
    pub success_count: i32,
    pub failed_count: i32,
    pub redirect_count: i32,
    pub duration: i64,
    pub started_at: ChronoDateTimeWithTimeZone,
    pub ended_at: Option<ChronoDateTimeWithTimeZone>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scrape_url::Entity")]
    ScrapeUrls,
}

impl Related<super::scrape_url::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScrapeUrls.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

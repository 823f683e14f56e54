//! [`Bicycle`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{bicycle, Bicycle},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<bicycle::Id, Bicycle>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[bicycle::Id]>,
{
    type Ok = HashMap<bicycle::Id, Bicycle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<bicycle::Id, Bicycle>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[bicycle::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, seller_id, \
                   category, brand, model, \
                   purchase_year, price, condition, \
                   status, is_premium, \
                   created_at \
            FROM bicycles \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Bicycle {
                        id,
                        seller_id: row.get("seller_id"),
                        category: row.get("category"),
                        brand: row.get("brand"),
                        model: row.get("model"),
                        purchase_year: row.get("purchase_year"),
                        price: row.get("price"),
                        condition: row.get("condition"),
                        status: row.get("status"),
                        is_premium: row.get("is_premium"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Bicycle>, bicycle::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<bicycle::Id, Bicycle>, [bicycle::Id; 1]>>,
        Ok = HashMap<bicycle::Id, Bicycle>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Bicycle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Bicycle>, bicycle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Bicycle>, read::bicycle::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Bicycle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Bicycle>, read::bicycle::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::bicycle::list::Filter {
            category,
            condition,
            brand,
            premium_only,
            min_price,
            max_price,
            include_sold,
            sort,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let condition_idx = condition.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let brand_pattern =
            brand.as_ref().map(|b| FuzzPattern::new(b.as_ref()));
        let brand_idx = brand_pattern.as_ref().map(|b| {
            ps.push(b);
            ps.len()
        });
        let min_price_idx = min_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let max_price_idx = max_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let available = bicycle::Status::Available;
        let status_idx = (!include_sold).then(|| {
            ps.push(&available);
            ps.len()
        });

        let sql = format!(
            "SELECT id, seller_id, \
                    category, brand, model, \
                    purchase_year, price, condition, \
                    status, is_premium, \
                    created_at \
             FROM bicycles \
             WHERE true \
                   {category_filtering} \
                   {condition_filtering} \
                   {brand_filtering} \
                   {min_price_filtering} \
                   {max_price_filtering} \
                   {premium_filtering} \
                   {status_filtering} \
             ORDER BY {ordering}, id ASC",
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::INT2"))
                }),
            condition_filtering =
                condition_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND condition = ${idx}::INT2"))
                }),
            brand_filtering =
                brand_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(brand) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            min_price_filtering =
                min_price_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND price >= ${idx}::INT4"))
                }),
            max_price_filtering =
                max_price_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND price <= ${idx}::INT4"))
                }),
            premium_filtering = if premium_only { "AND is_premium" } else { "" },
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            ordering = sort.sql(),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Bicycle {
                id: row.get("id"),
                seller_id: row.get("seller_id"),
                category: row.get("category"),
                brand: row.get("brand"),
                model: row.get("model"),
                purchase_year: row.get("purchase_year"),
                price: row.get("price"),
                condition: row.get("condition"),
                status: row.get("status"),
                is_premium: row.get("is_premium"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Bicycle>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Bicycle>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(bicycle): Insert<Bicycle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(bicycle))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Bicycle>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(bicycle): Update<Bicycle>,
    ) -> Result<Self::Ok, Self::Err> {
        let Bicycle {
            id,
            seller_id,
            category,
            brand,
            model,
            purchase_year,
            price,
            condition,
            status,
            is_premium,
            created_at,
        } = bicycle;

        const SQL: &str = "\
            INSERT INTO bicycles (\
                id, seller_id, \
                category, brand, model, \
                purchase_year, price, condition, \
                status, is_premium, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::INT2, $4::VARCHAR, $5::VARCHAR, \
                $6::INT4, $7::INT4, $8::INT2, \
                $9::INT2, $10::BOOL, \
                $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET seller_id = EXCLUDED.seller_id, \
                category = EXCLUDED.category, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                purchase_year = EXCLUDED.purchase_year, \
                price = EXCLUDED.price, \
                condition = EXCLUDED.condition, \
                status = EXCLUDED.status, \
                is_premium = EXCLUDED.is_premium, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &seller_id,
                &category,
                &brand,
                &model,
                &purchase_year,
                &price,
                &condition,
                &status,
                &is_premium,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Bicycle, bicycle::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Bicycle, bicycle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: bicycle::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bicycles \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

//! Canonical column names of the sales schema.

pub const FECHA: &str = "fecha";
pub const MES_VENTA: &str = "mes_venta";
pub const NOMBRE_DEL_VENDEDOR: &str = "nombre_del_vendedor";
pub const NOMBRE_DEL_SUPERMERCADO: &str = "nombre_del_supermercado";
pub const REPRESENTANTE_DE_COMPRAS: &str = "representante_de_compras";
pub const ESTADO: &str = "estado";
pub const CIUDAD: &str = "ciudad";
pub const CATEGORIA: &str = "categoria";
pub const PRODUCTO: &str = "producto";
pub const PRESENTACION: &str = "presentacion";
pub const PRECIO_UNITARIO_USD: &str = "precio_unitario_usd";
pub const CANTIDAD_COMPRADA: &str = "cantidad_comprada";
pub const VALOR_TOTAL_USD: &str = "valor_total_usd";
pub const FORMA_PAGO: &str = "forma_pago";
pub const TIPO_PRODUCTO: &str = "tipo_producto";
pub const REGION: &str = "region";

/// Output column order. Columns absent from a table are skipped, never padded.
pub const CANONICAL_ORDER: &[&str] = &[
    FECHA,
    MES_VENTA,
    NOMBRE_DEL_VENDEDOR,
    NOMBRE_DEL_SUPERMERCADO,
    REPRESENTANTE_DE_COMPRAS,
    ESTADO,
    CIUDAD,
    CATEGORIA,
    PRODUCTO,
    PRESENTACION,
    PRECIO_UNITARIO_USD,
    CANTIDAD_COMPRADA,
    VALOR_TOTAL_USD,
    FORMA_PAGO,
    TIPO_PRODUCTO,
    REGION,
];
